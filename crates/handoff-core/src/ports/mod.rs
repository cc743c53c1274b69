//! Ports - 抽象化レイヤー
//!
//! 時刻だけは外から差し替えられるようにしておく（テストでは FixedClock）。

pub mod clock;

pub use self::clock::{Clock, FixedClock, PadSide, SystemClock, format_time, pad_zeros};
