//! Errors - エラー型
//!
//! 回復層は最小限: allocation 失敗と worker 切断はログに出して Idle に戻るだけ。
//! リトライはしない。

use std::collections::TryReserveError;

use thiserror::Error;

use crate::domain::state::RunState;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("a run is already in flight (state={0})")]
    RunInFlight(RunState),

    #[error("failed to allocate {bytes} bytes: {source}")]
    Allocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("worker is no longer accepting messages")]
    WorkerClosed,

    #[error("controller is no longer listening to the worker")]
    ControllerClosed,

    #[error("blocking task failed: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
