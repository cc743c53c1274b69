//! handoff-core
//!
//! Building blocks for the buffer hand-off demo: a large byte block is allocated on
//! the controller side and handed to a background worker either as a copy or by
//! moving ownership, with every step written to an append-only console.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, buffer, message, state, log, errors）
//! - **ports**: 抽象化レイヤー（Clock）
//! - **console**: append-only なログ表示面
//! - **worker**: worker factory と既定の AckWorker
//! - **app**: RunController と RunConfig

pub mod domain;
pub mod ports;
pub mod console;
pub mod worker;
pub mod app;

pub use app::{RunConfig, RunController, Trigger};
pub use console::Console;
pub use domain::{HandoffError, LogEntry, LogSource, RunReport, RunState, TransferMode};
pub use worker::{AckWorker, WorkerBody, WorkerHandle, WorkerScope, spawn_worker, worker_fn};
