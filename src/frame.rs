//! # 帧格式模块
//!
//! 帧是实际写入最低有效位的比特流。普通帧：
//!
//! ```text
//! [32 bits] 负载长度 L (大端位序)
//! [L bytes] 负载，每个字节从最高位开始写入
//! ```
//!
//! 校验帧：
//!
//! ```text
//! [32 bits] 长度字：最高位为格式标志 (置 1)，低 31 位为 L
//! [16 bits] 调用者提供的修订号 (大端位序)
//! [32 bits] CRC-32，覆盖修订号的两个字节与负载
//! [L bytes] 负载
//! ```
//!
//! 普通帧的长度永远不超过 [`MAX_PAYLOAD_LEN`]，所以格式标志在普通帧中总是 0。
//! 只有按校验帧配置的编解码器才会把格式标志当作标志来解读。

use crate::constants::{CHECKSUM_BITS, FORMAT_FLAG, HEADER_BITS, MAX_PAYLOAD_LEN, REVISION_BITS};
use crate::error::LsbError;

/// 帧的版本。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameFormat {
    /// 只有 32 位长度头。
    #[default]
    Plain,
    /// 长度字带格式标志，之后是修订号与 CRC-32。
    Checked,
}

impl FrameFormat {
    /// 负载之前的头部所占的位数。
    pub const fn header_bits(self) -> usize {
        match self {
            Self::Plain => HEADER_BITS,
            Self::Checked => HEADER_BITS + REVISION_BITS + CHECKSUM_BITS,
        }
    }
}

/// 解析出的 (或即将写入的) 帧头。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    payload_len: u32,
    checked: Option<CheckedFields>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CheckedFields {
    revision: u16,
    checksum: u32,
}

impl FrameHeader {
    /// 为负载构建帧头。普通帧忽略 `revision`。
    ///
    /// # Errors
    ///
    /// 负载长度超过 [`MAX_PAYLOAD_LEN`] 时返回 [`LsbError::CapacityExceeded`]。
    pub fn for_payload(payload: &[u8], format: FrameFormat, revision: u16) -> Result<Self, LsbError> {
        let payload_len = length_field(payload.len())?;

        let checked = match format {
            FrameFormat::Plain => None,
            FrameFormat::Checked => Some(CheckedFields {
                revision,
                checksum: checksum_of(revision, payload),
            }),
        };

        Ok(Self {
            payload_len,
            checked,
        })
    }

    /// 从普通帧的长度字构建帧头，长度字整体就是 L。
    pub(crate) fn plain(payload_len: u32) -> Self {
        Self {
            payload_len,
            checked: None,
        }
    }

    /// 从读到的校验帧字段构建帧头。`payload_len` 已去掉格式标志。
    pub(crate) fn checked(payload_len: u32, revision: u16, checksum: u32) -> Self {
        debug_assert_eq!(payload_len & FORMAT_FLAG, 0);
        Self {
            payload_len,
            checked: Some(CheckedFields { revision, checksum }),
        }
    }

    /// 负载字节数。
    pub fn payload_len(&self) -> usize {
        self.payload_len as usize
    }

    /// 修订号，仅校验帧携带。
    pub fn revision(&self) -> Option<u16> {
        self.checked.map(|fields| fields.revision)
    }

    /// 存储的 CRC-32，仅校验帧携带。
    pub fn checksum(&self) -> Option<u32> {
        self.checked.map(|fields| fields.checksum)
    }

    pub fn format(&self) -> FrameFormat {
        match self.checked {
            None => FrameFormat::Plain,
            Some(_) => FrameFormat::Checked,
        }
    }

    /// 写入最前面 32 位的长度字，校验帧会置位格式标志。
    pub fn length_word(&self) -> u32 {
        match self.format() {
            FrameFormat::Plain => self.payload_len,
            FrameFormat::Checked => self.payload_len | FORMAT_FLAG,
        }
    }

    /// 校验提取出的负载。普通帧总是通过。
    ///
    /// # Errors
    ///
    /// CRC-32 不符时返回 [`LsbError::ChecksumMismatch`]。
    pub fn verify(&self, payload: &[u8]) -> Result<(), LsbError> {
        let Some(CheckedFields { revision, checksum }) = self.checked else {
            return Ok(());
        };

        let actual = checksum_of(revision, payload);
        if checksum != actual {
            return Err(LsbError::ChecksumMismatch {
                expected: checksum,
                actual,
            });
        }
        Ok(())
    }
}

/// 把负载长度转换为长度字的低 31 位。
fn length_field(len: usize) -> Result<u32, LsbError> {
    u32::try_from(len)
        .ok()
        .filter(|&field| field & FORMAT_FLAG == 0)
        .ok_or(LsbError::CapacityExceeded {
            required: len,
            available: MAX_PAYLOAD_LEN,
        })
}

fn checksum_of(revision: u16, payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&revision.to_be_bytes());
    hasher.update(payload);
    hasher.finalize()
}
