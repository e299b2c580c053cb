//! # 错误类型模块
//!
//! 隐写核心的全部失败情形。所有错误都同步返回给调用者，核心内部从不重试。

use thiserror::Error;

/// 嵌入或提取过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LsbError {
    /// 像素缓冲区少于 3 个通道，无法使用 R/G/B 的最低有效位。
    #[error("Unsupported pixel format: at least 3 channels (R, G, B) are required, found {channels}")]
    UnsupportedFormat { channels: u8 },

    /// 负载超过了缓冲区能容纳的字节数。嵌入在写入任何样本之前就被中止。
    #[error("Capacity exceeded: the payload needs {required} bytes but the buffer can carry only {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// 长度头声明的长度超出了缓冲区自身的容量。
    /// 这说明缓冲区从未被嵌入过数据，或者之后被破坏/截断了。
    #[error("Corrupt frame: header declares {declared} bytes but the buffer can carry only {capacity}")]
    CorruptFrame { declared: usize, capacity: usize },

    /// 校验帧中存储的 CRC-32 与提取出的负载不符。
    #[error("Checksum mismatch: frame carries {expected:#010x}, payload hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// 样本数量与 `width * height * channels` 不一致。
    #[error("Invalid pixel buffer: {width}x{height} with {channels} channels does not match {len} samples")]
    InvalidBuffer {
        width: u32,
        height: u32,
        channels: u8,
        len: usize,
    },
}

/// `embed` 返回的错误类型。
pub type EmbedError = LsbError;

/// `extract` 返回的错误类型。
pub type ExtractError = LsbError;
