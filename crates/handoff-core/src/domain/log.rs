//! Log entries shown on the console.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the hand-off produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    /// The background worker.
    Worker,
    /// The controlling side.
    Thread,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Thread => "thread",
        }
    }

    /// Uppercased tag rendered ahead of the message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Worker => "WORKER",
            Self::Thread => "THREAD",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable console line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub source: LogSource,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.time, self.source.label(), self.message)
    }
}
