//! Buffer - ワーカーへ渡すメモリブロック
//!
//! Copy と Transfer の違いは Rust では clone と move の違いそのもの。
//! Transfer モードでは送信側の束縛が消費され、以後コンパイラが使用を拒否する。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::HandoffError;

/// Bytes in one megabyte as the demo counts them.
pub const BYTES_PER_MB: usize = 1024 * 1024;

/// How a block is handed to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// The worker receives an independent copy; the sender keeps its block.
    #[default]
    Copy,
    /// Ownership moves to the worker; the sender's handle is consumed.
    Transfer,
}

impl TransferMode {
    pub fn from_flag(transfer: bool) -> Self {
        if transfer { Self::Transfer } else { Self::Copy }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Copy => Self::Transfer,
            Self::Transfer => Self::Copy,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy"),
            Self::Transfer => f.write_str("transfer"),
        }
    }
}

/// A contiguous, zero-filled block allocated fresh for every run.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Allocate `len` zeroed bytes.
    ///
    /// Probes with `try_reserve_exact` first so an oversized request comes back as
    /// `HandoffError::Allocation` instead of aborting the process. Blocking for
    /// large `len`; call it off the async threads.
    pub fn allocate(len: usize) -> Result<Self, HandoffError> {
        Vec::<u8>::new()
            .try_reserve_exact(len)
            .map_err(|source| HandoffError::Allocation { bytes: len, source })?;
        // vec! はゼロページを直接もらえるので resize より速い
        Ok(Self { bytes: vec![0u8; len] })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

// 中身を出すと数百 MB のダンプになるので長さだけ
impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer").field("len", &self.bytes.len()).finish()
    }
}

/// The message the controller posts to the worker.
#[derive(Debug)]
pub struct Payload {
    buffer: Buffer,
    mode: TransferMode,
}

impl Payload {
    /// Package `buffer` for dispatch. Copy mode clones the whole block, so this
    /// blocks for large buffers.
    ///
    /// Returns the payload plus whatever the sender still owns afterwards:
    /// - `Transfer`: the block moves into the payload, nothing is left behind.
    /// - `Copy`: the payload carries a clone and the original comes back.
    pub fn prepare(buffer: Buffer, mode: TransferMode) -> (Self, Option<Buffer>) {
        match mode {
            TransferMode::Transfer => (Self { buffer, mode }, None),
            TransferMode::Copy => {
                let copy = buffer.clone();
                (Self { buffer: copy, mode }, Some(buffer))
            }
        }
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}
