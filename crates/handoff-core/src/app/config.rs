//! RunConfig - controller が所有する設定

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::HandoffError;
use crate::domain::buffer::BYTES_PER_MB;

/// Settings owned by the run controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Size of the block allocated per run, in megabytes.
    pub buffer_size_mb: usize,

    /// Initial transfer mode. Can be toggled at runtime.
    pub transfer: bool,

    /// Pause between logging the intent and allocating, so the log line
    /// reaches the console before the allocation hogs the thread.
    pub render_delay_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            buffer_size_mb: 1000,
            transfer: false,
            render_delay_ms: 100,
        }
    }
}

impl RunConfig {
    /// `buffer_size_mb * 1024 * 1024`.
    pub fn buffer_bytes(&self) -> Result<usize, HandoffError> {
        self.buffer_size_mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
            HandoffError::InvalidConfig(format!(
                "buffer_size_mb={} overflows the address space",
                self.buffer_size_mb
            ))
        })
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }

    pub fn validate(&self) -> Result<(), HandoffError> {
        self.buffer_bytes().map(|_| ())
    }
}
