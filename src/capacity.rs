//! # 容量模块
//!
//! 纯计算：一个像素缓冲区能携带多少负载字节，以及某个负载是否放得下。

use crate::constants::{MAX_PAYLOAD_LEN, USABLE_CHANNELS};
use crate::error::LsbError;
use crate::frame::FrameFormat;
use crate::pixel_buffer::PixelBuffer;

/// 可用于隐写的通道位数，即 `width * height * 3`。
///
/// # Errors
///
/// 缓冲区少于 3 个通道时返回 [`LsbError::UnsupportedFormat`]。
pub fn channel_capacity_bits<S: AsRef<[u8]>>(buffer: &PixelBuffer<S>) -> Result<usize, LsbError> {
    if (buffer.channels() as usize) < USABLE_CHANNELS {
        return Err(LsbError::UnsupportedFormat {
            channels: buffer.channels(),
        });
    }
    Ok(buffer.pixel_count() * USABLE_CHANNELS)
}

/// 普通帧下可携带的最大负载字节数。
pub fn max_payload_bytes<S: AsRef<[u8]>>(buffer: &PixelBuffer<S>) -> Result<usize, LsbError> {
    max_payload_bytes_for(buffer, FrameFormat::Plain)
}

/// 指定帧格式下可携带的最大负载字节数。头部放不下时为 0。
pub fn max_payload_bytes_for<S: AsRef<[u8]>>(
    buffer: &PixelBuffer<S>,
    format: FrameFormat,
) -> Result<usize, LsbError> {
    let bits = channel_capacity_bits(buffer)?;
    let payload_bytes = bits.saturating_sub(format.header_bits()) / 8;
    Ok(payload_bytes.min(MAX_PAYLOAD_LEN))
}

/// 普通帧下长度为 `payload_length` 的负载是否放得下。
pub fn fits<S: AsRef<[u8]>>(buffer: &PixelBuffer<S>, payload_length: usize) -> Result<bool, LsbError> {
    fits_for(buffer, payload_length, FrameFormat::Plain)
}

/// 指定帧格式下负载是否放得下。
///
/// 普通帧允许头部被截断的空负载 (头部全为 0)，校验帧则要求整个头部都能写下。
pub fn fits_for<S: AsRef<[u8]>>(
    buffer: &PixelBuffer<S>,
    payload_length: usize,
    format: FrameFormat,
) -> Result<bool, LsbError> {
    let header_fits = match format {
        FrameFormat::Plain => true,
        FrameFormat::Checked => channel_capacity_bits(buffer)? >= format.header_bits(),
    };
    Ok(header_fits && payload_length <= max_payload_bytes_for(buffer, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(width: u32, height: u32, channels: u8) -> PixelBuffer<Vec<u8>> {
        let len = (width * height) as usize * channels as usize;
        PixelBuffer::new(width, height, channels, vec![0; len]).unwrap()
    }

    #[test]
    fn four_by_four_rgb_carries_two_bytes() {
        let b = buffer(4, 4, 3);
        assert_eq!(channel_capacity_bits(&b).unwrap(), 48);
        assert_eq!(max_payload_bytes(&b).unwrap(), 2);
        assert!(fits(&b, 2).unwrap());
        assert!(!fits(&b, 3).unwrap());
    }

    #[test]
    fn alpha_is_not_counted() {
        let rgb = buffer(10, 10, 3);
        let rgba = buffer(10, 10, 4);
        assert_eq!(
            channel_capacity_bits(&rgb).unwrap(),
            channel_capacity_bits(&rgba).unwrap()
        );
        assert_eq!(max_payload_bytes(&rgba).unwrap(), (300 - 32) / 8);
    }

    #[test]
    fn too_few_channels() {
        for channels in [1, 2] {
            let b = buffer(4, 4, channels);
            assert_eq!(
                channel_capacity_bits(&b),
                Err(LsbError::UnsupportedFormat { channels })
            );
            assert!(fits(&b, 0).is_err());
        }
    }

    #[test]
    fn header_larger_than_buffer() {
        let b = buffer(1, 1, 3);
        assert_eq!(max_payload_bytes(&b).unwrap(), 0);
        assert!(fits(&b, 0).unwrap());
        assert!(!fits(&b, 1).unwrap());
        assert!(!fits_for(&b, 0, FrameFormat::Checked).unwrap());
    }

    #[test]
    fn checked_frames_reserve_room_for_revision_and_checksum() {
        let b = buffer(10, 10, 3);
        assert_eq!(max_payload_bytes_for(&b, FrameFormat::Checked).unwrap(), (300 - 80) / 8);
        assert!(fits_for(&b, 27, FrameFormat::Checked).unwrap());
        assert!(!fits_for(&b, 28, FrameFormat::Checked).unwrap());
    }
}
