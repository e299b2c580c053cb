//! # LSB 编解码模块
//!
//! 把帧逐位写入 R/G/B 通道的最低有效位，或按同样的顺序读回。
//! 编解码器不持有任何跨调用的状态，所有遍历状态都在单次调用内。

use crate::capacity;
use crate::constants::FORMAT_FLAG;
use crate::cursor::BitCursor;
use crate::error::{EmbedError, ExtractError, LsbError};
use crate::frame::{FrameFormat, FrameHeader};
use crate::pixel_buffer::PixelBuffer;
use log::{debug, trace};

/// 嵌入与提取引擎。
///
/// 帧格式同时决定嵌入写什么以及提取如何解读长度字：普通编解码器把 32 位整体当作长度，
/// 校验编解码器在格式标志置位时按校验帧解析，未置位时仍按普通帧读取。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsbCodec {
    format: FrameFormat,
    revision: u16,
}

impl LsbCodec {
    /// 使用普通帧 (只有长度头) 的编解码器。
    pub const fn new() -> Self {
        Self {
            format: FrameFormat::Plain,
            revision: 0,
        }
    }

    pub const fn with_format(format: FrameFormat) -> Self {
        Self {
            format,
            revision: 0,
        }
    }

    /// 设置写入校验帧的修订号。普通帧不携带修订号。
    pub const fn with_revision(self, revision: u16) -> Self {
        Self {
            format: self.format,
            revision,
        }
    }

    pub const fn format(&self) -> FrameFormat {
        self.format
    }

    pub const fn revision(&self) -> u16 {
        self.revision
    }

    /// 把 `payload` 嵌入 `buffer`，原地修改样本。
    ///
    /// 遍历总是从像素 (0,0) 重新开始，所以重复嵌入会确定性地覆盖上一帧。
    /// 已消耗范围之外的样本以及所有 alpha 样本保持不变。
    ///
    /// # Errors
    ///
    /// * [`LsbError::UnsupportedFormat`] - 缓冲区少于 3 个通道。
    /// * [`LsbError::CapacityExceeded`] - 负载放不下；此时没有任何样本被修改。
    pub fn embed<S>(&self, buffer: &mut PixelBuffer<S>, payload: &[u8]) -> Result<(), EmbedError>
    where
        S: AsRef<[u8]> + AsMut<[u8]>,
    {
        trace!(
            "embedding into {}x{} buffer with {} channels",
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );

        if !capacity::fits_for(buffer, payload.len(), self.format)? {
            return Err(LsbError::CapacityExceeded {
                required: payload.len(),
                available: capacity::max_payload_bytes_for(buffer, self.format)?,
            });
        }

        let header = FrameHeader::for_payload(payload, self.format, self.revision)?;
        let capacity_bits = capacity::channel_capacity_bits(buffer)?;
        let frame_bits = self.format.header_bits() + payload.len() * 8;
        // 只有普通帧的空负载允许头部被截断
        debug_assert!(
            frame_bits <= capacity_bits || (self.format == FrameFormat::Plain && payload.is_empty())
        );

        let mut cursor = BitCursor::new(buffer.pixel_count(), buffer.channels() as usize);
        let samples = buffer.samples_mut();

        let mut written = cursor.write_u32(samples, header.length_word());
        if let (Some(revision), Some(checksum)) = (header.revision(), header.checksum()) {
            written += cursor.write_u16(samples, revision);
            written += cursor.write_u32(samples, checksum);
        }
        for &byte in payload {
            written += cursor.write_byte(samples, byte);
        }
        debug_assert_eq!(written, frame_bits.min(capacity_bits));

        debug!(
            "embedded {:?} frame with {} payload bytes ({} bits)",
            self.format,
            payload.len(),
            cursor.consumed()
        );
        Ok(())
    }

    /// 从 `buffer` 中提取负载。
    ///
    /// # Errors
    ///
    /// * [`LsbError::UnsupportedFormat`] - 缓冲区少于 3 个通道。
    /// * [`LsbError::CorruptFrame`] - 长度头声明的长度超出缓冲区容量。
    /// * [`LsbError::ChecksumMismatch`] - 校验帧的 CRC-32 与负载不符。
    pub fn extract<S: AsRef<[u8]>>(&self, buffer: &PixelBuffer<S>) -> Result<Vec<u8>, ExtractError> {
        let (header, mut cursor) = self.read_header(buffer)?;

        let samples = buffer.samples();
        let payload: Vec<u8> = (0..header.payload_len())
            .map(|_| cursor.read_byte(samples))
            .collect();

        header.verify(&payload)?;
        debug!(
            "extracted {:?} frame with {} payload bytes",
            header.format(),
            payload.len()
        );
        Ok(payload)
    }

    /// 只读取帧头而不读取负载，用于在提取前查看缓冲区中是否有可信的帧。
    ///
    /// 与 [`LsbCodec::extract`] 做同样的长度检查，但不校验 CRC-32。
    pub fn inspect<S: AsRef<[u8]>>(&self, buffer: &PixelBuffer<S>) -> Result<FrameHeader, ExtractError> {
        self.read_header(buffer).map(|(header, _)| header)
    }

    /// 读取帧头，返回停在负载第一位上的游标。
    fn read_header<S: AsRef<[u8]>>(
        &self,
        buffer: &PixelBuffer<S>,
    ) -> Result<(FrameHeader, BitCursor), LsbError> {
        // 先检查通道数，否则游标会按错误的步长遍历
        capacity::channel_capacity_bits(buffer)?;

        let mut cursor = BitCursor::new(buffer.pixel_count(), buffer.channels() as usize);
        let samples = buffer.samples();
        let word = cursor.read_u32(samples);

        let (format, declared) = match self.format {
            FrameFormat::Checked if word & FORMAT_FLAG != 0 => {
                (FrameFormat::Checked, word & !FORMAT_FLAG)
            }
            _ => (FrameFormat::Plain, word),
        };

        if !capacity::fits_for(buffer, declared as usize, format)? {
            debug!("implausible {format:?} frame header declaring {declared} bytes");
            return Err(LsbError::CorruptFrame {
                declared: declared as usize,
                capacity: capacity::max_payload_bytes_for(buffer, format)?,
            });
        }

        let header = match format {
            FrameFormat::Plain => FrameHeader::plain(declared),
            FrameFormat::Checked => {
                let revision = cursor.read_u16(samples);
                let checksum = cursor.read_u32(samples);
                FrameHeader::checked(declared, revision, checksum)
            }
        };
        Ok((header, cursor))
    }
}
