//! State - run の状態と完了レポート

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::buffer::TransferMode;
use crate::domain::ids::RunId;

/// RunState は controller の状態
///
/// # 状態遷移
/// - Idle → Allocating: start()（trigger を無効化）
/// - Allocating → Dispatching: render delay の後に buffer を確保
/// - Dispatching → AwaitingReply: yield してから worker へ送信
/// - AwaitingReply → Idle: worker の返信を受信（trigger を有効化）
///
/// タイムアウトは無い。worker が返信しなければ AwaitingReply のまま。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Allocating,
    Dispatching,
    AwaitingReply,
}

impl RunState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Allocating => "allocating",
            Self::Dispatching => "dispatching",
            Self::AwaitingReply => "awaiting_reply",
        };
        f.write_str(s)
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub mode: TransferMode,
    pub bytes: usize,
    /// Whether the controller still owned its block after posting it.
    pub sender_retained: bool,
    /// From dispatch to the worker's reply.
    pub round_trip: Duration,
}
