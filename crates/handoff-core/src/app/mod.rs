//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **RunConfig**: buffer サイズ・転送モード・render delay
//! - **RunController**: Idle → Allocating → Dispatching → AwaitingReply → Idle
//! - **Trigger**: "Start" ボタン相当の有効/無効ビュー

pub mod config;
pub mod controller;
pub mod trigger;

pub use self::config::RunConfig;
pub use self::controller::RunController;
pub use self::trigger::Trigger;
