//! Console session
//!
//! Reads commands line by line and writes one response per command. A line is never
//! buffered past the configured command length; the excess is skipped unread.

use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::commands::{CommandStatus, parse_command};
use super::handlers::handle_command;
use super::responses::{self, format_response};
use crate::config::DriveConfig;
use crate::drive::DriveManager;

/// Runs a console session until QUIT or end of input.
pub async fn run_session<R, W>(
    manager: &DriveManager,
    config: &DriveConfig,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format_response(responses::READY, "rax-drive ready").as_bytes())
        .await?;
    writer.flush().await?;

    let max = config.console.max_command_length;
    // Room for the longest accepted command plus a CRLF terminator.
    let cap = max as u64 + 2;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = (&mut reader).take(cap).read_until(b'\n', &mut buf).await?;
        if n == 0 {
            info!("Console input closed");
            return Ok(());
        }

        let truncated = !buf.ends_with(b"\n") && n as u64 == cap;
        if truncated {
            let skipped = discard_line(&mut reader).await?;
            warn!("Rejected command of at least {} bytes", n + skipped);
        }
        let line = String::from_utf8_lossy(&buf);
        if !truncated && line.trim().is_empty() {
            continue;
        }

        if truncated || line.trim_end().len() > max {
            if !truncated {
                warn!("Rejected command of {} bytes", line.len());
            }
            writer
                .write_all(
                    format_response(responses::LINE_TOO_LONG, "Command line too long").as_bytes(),
                )
                .await?;
            writer.flush().await?;
            continue;
        }

        let result = handle_command(manager, config, parse_command(&line)).await;
        writer.write_all(result.message.as_bytes()).await?;
        writer.flush().await?;

        if result.status == CommandStatus::CloseSession {
            return Ok(());
        }
    }
}

/// Consume input up to and including the next newline, returning the bytes skipped.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;
    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(skipped);
            }
            match available.iter().position(|b| *b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        skipped += used;
        if done {
            return Ok(skipped);
        }
    }
}
