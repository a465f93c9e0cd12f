//! Consciousness state publishing
//!
//! The storage backend is the single writer of `DriveConsciousnessState`; everyone
//! else holds a `watch::Receiver` onto the same channel.

use log::debug;
use std::sync::Arc;
use tokio::sync::watch;

use crate::drive::DriveConsciousnessState;

pub const METRIC_FILES_INDEXED: &str = "files_indexed";
pub const METRIC_BYTES_STORED: &str = "bytes_stored";
pub const METRIC_OPERATIONS_COMPLETED: &str = "operations_completed";

/// Writer side of the consciousness state channel
#[derive(Debug, Clone)]
pub struct ConsciousnessTracker {
    sender: Arc<watch::Sender<DriveConsciousnessState>>,
    receiver: watch::Receiver<DriveConsciousnessState>,
}

impl Default for ConsciousnessTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsciousnessTracker {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(DriveConsciousnessState::default());
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Handle onto the published state. All handles share one channel.
    pub fn subscribe(&self) -> watch::Receiver<DriveConsciousnessState> {
        self.receiver.clone()
    }

    pub fn current(&self) -> DriveConsciousnessState {
        self.sender.borrow().clone()
    }

    pub fn set_active(&self, active: bool) {
        self.sender.send_modify(|state| {
            state.is_active = active;
            if !active {
                state.operations.clear();
                state.metrics.clear();
            }
        });
    }

    pub fn set_metric(&self, name: &str, value: f64) {
        self.sender.send_modify(|state| {
            state.metrics.insert(name.to_string(), value);
        });
    }

    /// Record `label` as in flight until the returned guard is dropped.
    pub fn begin(&self, label: impl Into<String>) -> OperationGuard {
        let label = label.into();
        debug!("Operation started: {}", label);
        self.sender
            .send_modify(|state| state.operations.push(label.clone()));
        OperationGuard {
            sender: Arc::clone(&self.sender),
            label,
        }
    }
}

/// Removes its operation label from the published state on drop.
#[derive(Debug)]
pub struct OperationGuard {
    sender: Arc<watch::Sender<DriveConsciousnessState>>,
    label: String,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        debug!("Operation finished: {}", self.label);
        // Deactivation already cleared this label; nothing left to count.
        self.sender.send_if_modified(|state| {
            let Some(pos) = state.operations.iter().position(|op| op == &self.label) else {
                return false;
            };
            state.operations.remove(pos);
            let done = state
                .metrics
                .get(METRIC_OPERATIONS_COMPLETED)
                .copied()
                .unwrap_or(0.0);
            state
                .metrics
                .insert(METRIC_OPERATIONS_COMPLETED.to_string(), done + 1.0);
            true
        });
    }
}
