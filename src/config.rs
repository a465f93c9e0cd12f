//! Configuration management for rax-drive
//!
//! Loads `config.toml` with `RAX_DRIVE__<SECTION>__<KEY>` environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::drive::{BandwidthLimit, ConflictResolution, SyncConfiguration};
use crate::security::validation::is_safe_name;

/// Complete drive configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
}

/// Where and how files are stored
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory holding drive files
    pub drive_root: String,

    /// Directory under the root holding in-progress uploads
    pub staging_dir: String,
}

/// Security policy applied by the policy gate
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Refuse to bring the drive up
    pub lockdown: bool,

    /// Maximum upload payload in MiB
    pub max_file_size_mb: u64,

    /// Extensions rejected on upload, compared case-insensitively
    pub blocked_extensions: Vec<String>,

    /// Byte sequences marking a payload as malware
    pub malware_signatures: Vec<String>,

    /// Users allowed to read and delete other users' non-classified files
    pub admins: Vec<String>,
}

/// Defaults for console-triggered sync runs
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub bidirectional: bool,
    pub conflict_resolution: ConflictResolution,

    /// KiB/s, 0 = unlimited
    pub upload_limit_kbps: u64,
    pub download_limit_kbps: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    pub max_command_length: usize,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                drive_root: "./drive_root".to_string(),
                staging_dir: ".staging".to_string(),
            },
            security: SecurityConfig {
                lockdown: false,
                max_file_size_mb: 64,
                blocked_extensions: ["exe", "bat", "scr", "dll"]
                    .iter()
                    .map(|ext| ext.to_string())
                    .collect(),
                malware_signatures: vec!["X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR".to_string()],
                admins: vec!["admin".to_string()],
            },
            sync: SyncConfig {
                bidirectional: true,
                conflict_resolution: ConflictResolution::NewestWins,
                upload_limit_kbps: 0,
                download_limit_kbps: 0,
            },
            logging: LoggingConfig {
                log_level: "info".to_string(),
            },
            console: ConsoleConfig {
                max_command_length: 1024,
            },
        }
    }
}

impl DriveConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = ["rax-drive/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("RAX_DRIVE").separator("__"))
                .build()
            {
                Ok(settings) => {
                    let config: DriveConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(ConfigError::Message(format!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.drive_root.trim().is_empty() {
            return Err(ConfigError::Message("drive_root cannot be empty".into()));
        }

        if !is_safe_name(&self.storage.staging_dir) {
            return Err(ConfigError::Message(
                "staging_dir must be a single directory name".into(),
            ));
        }

        if self.security.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_file_size_mb must be greater than 0".into(),
            ));
        }

        if self.security.malware_signatures.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::Message(
                "malware signatures cannot be empty".into(),
            ));
        }

        if self.console.max_command_length == 0 {
            return Err(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StorageConfig {
    /// Get drive root as PathBuf
    pub fn drive_root_path(&self) -> PathBuf {
        PathBuf::from(&self.drive_root)
    }
}

impl SecurityConfig {
    /// Get maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl SyncConfig {
    pub fn to_sync_configuration(&self) -> SyncConfiguration {
        SyncConfiguration {
            bidirectional: self.bidirectional,
            conflict_resolution: self.conflict_resolution,
            bandwidth_limit: BandwidthLimit {
                upload_kbps: self.upload_limit_kbps,
                download_kbps: self.download_limit_kbps,
            },
        }
    }
}
