//! Messages posted by the worker back to the controller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Worker → controller message.
///
/// `Ready` is sent once at start-up. Anything else is treated as the reply to the
/// payload in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    Ready,
    DataReceived,
    Text(String),
}

impl WorkerMessage {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for WorkerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready!"),
            Self::DataReceived => f.write_str("Data received"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
