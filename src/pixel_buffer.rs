//! # 像素缓冲区模块
//!
//! 对调用者持有的扁平样本数组的一层带校验的视图。
//! 核心从不分配或释放样本，只在嵌入时原地修改，在提取时只读访问。

use crate::error::LsbError;

/// `width × height` 个像素，每个像素由 `channels` 个 8 位样本组成，按行优先排列。
///
/// `S` 可以是 `&[u8]`、`&mut [u8]` 或 `Vec<u8>`：提取只需要 `AsRef<[u8]>`，
/// 嵌入还需要 `AsMut<[u8]>`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<S> {
    width: u32,
    height: u32,
    channels: u8,
    samples: S,
}

impl<S: AsRef<[u8]>> PixelBuffer<S> {
    /// 包装一个样本数组。
    ///
    /// # Errors
    ///
    /// 如果 `width * height * channels` 溢出或不等于样本数量，返回 [`LsbError::InvalidBuffer`]。
    /// 通道数不足 3 的缓冲区在这里是合法的，只会在计算容量时被拒绝。
    pub fn new(width: u32, height: u32, channels: u8, samples: S) -> Result<Self, LsbError> {
        let len = samples.as_ref().len();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(channels as usize));

        if expected != Some(len) {
            return Err(LsbError::InvalidBuffer {
                width,
                height,
                channels,
                len,
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// 像素总数。构造时已经校验过乘法不会溢出。
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn samples(&self) -> &[u8] {
        self.samples.as_ref()
    }

    /// 取回被包装的样本存储。
    pub fn into_inner(self) -> S {
        self.samples
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> PixelBuffer<S> {
    pub fn samples_mut(&mut self) -> &mut [u8] {
        self.samples.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_geometry() {
        let samples = vec![0u8; 2 * 3 * 4];
        let buffer = PixelBuffer::new(2, 3, 4, samples).unwrap();
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.channels(), 4);
        assert_eq!(buffer.into_inner().len(), 24);
    }

    #[test]
    fn rejects_mismatched_sample_count() {
        let samples = [0u8; 10];
        match PixelBuffer::new(2, 2, 3, &samples[..]) {
            Err(LsbError::InvalidBuffer { len, .. }) => assert_eq!(len, 10),
            other => panic!("expected InvalidBuffer, got {other:?}"),
        }
    }

    #[test]
    fn rejects_overflowing_geometry() {
        let samples: [u8; 0] = [];
        assert!(PixelBuffer::new(u32::MAX, u32::MAX, 255, &samples[..]).is_err());
    }

    #[test]
    fn mutable_view_writes_through() {
        let mut samples = [1u8; 3];
        {
            let mut buffer = PixelBuffer::new(1, 1, 3, &mut samples[..]).unwrap();
            buffer.samples_mut()[2] = 9;
        }
        assert_eq!(samples, [1, 1, 9]);
    }
}
