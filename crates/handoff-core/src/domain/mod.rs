//! Domain model (ids, buffers, messages, run state, log entries, errors).

pub mod buffer;
pub mod errors;
pub mod ids;
pub mod log;
pub mod message;
pub mod state;

pub use buffer::{Buffer, Payload, TransferMode};
pub use errors::HandoffError;
pub use ids::RunId;
pub use log::{LogEntry, LogSource};
pub use message::WorkerMessage;
pub use state::{RunReport, RunState};
