//! # 比特游标模块
//!
//! 定义嵌入和提取共用的遍历顺序：像素按行优先，像素内按 R、G、B，
//! 跳过 alpha (以及任何多余的通道)，每个被访问的通道只读写最低有效位。

use crate::constants::{LSB_CLEAR_MASK, LSB_KEEP_MASK, USABLE_CHANNELS};

/// 单次 `embed`/`extract` 调用内的遍历状态，从不跨调用保留。
#[derive(Debug)]
pub(crate) struct BitCursor {
    pixel: usize,
    channel: usize,
    pixel_count: usize,
    stride: usize,
    consumed: usize,
}

impl BitCursor {
    /// `stride` 是每个像素的通道数，必须不小于 3。
    pub fn new(pixel_count: usize, stride: usize) -> Self {
        debug_assert!(stride >= USABLE_CHANNELS);
        Self {
            pixel: 0,
            channel: 0,
            pixel_count,
            stride,
            consumed: 0,
        }
    }

    /// 已经读写过的位数。
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn next_index(&mut self) -> Option<usize> {
        if self.pixel >= self.pixel_count {
            return None;
        }

        let index = self.pixel * self.stride + self.channel;
        self.channel += 1;
        if self.channel == USABLE_CHANNELS {
            self.channel = 0;
            self.pixel += 1;
        }
        self.consumed += 1;
        Some(index)
    }

    /// 写入一位，缓冲区耗尽时返回 `false`。
    pub fn write_bit(&mut self, samples: &mut [u8], bit: u8) -> bool {
        match self.next_index().and_then(|index| samples.get_mut(index)) {
            Some(sample) => {
                *sample = (*sample & LSB_CLEAR_MASK) | (bit & LSB_KEEP_MASK);
                true
            }
            None => false,
        }
    }

    /// 读取一位，缓冲区耗尽时返回 `None`。
    pub fn read_bit(&mut self, samples: &[u8]) -> Option<u8> {
        self.next_index()
            .and_then(|index| samples.get(index))
            .map(|sample| sample & LSB_KEEP_MASK)
    }

    /// 从最高位开始写入一个字节，返回实际写入的位数。
    pub fn write_byte(&mut self, samples: &mut [u8], byte: u8) -> usize {
        (0..8)
            .rev()
            .take_while(|&shift| self.write_bit(samples, (byte >> shift) & 1))
            .count()
    }

    /// 从最高位开始读取一个字节。缓冲区之外的位按 0 处理。
    pub fn read_byte(&mut self, samples: &[u8]) -> u8 {
        (0..8).fold(0u8, |acc, _| (acc << 1) | self.read_bit(samples).unwrap_or(0))
    }

    /// 以大端位序写入一个 `u16`，返回实际写入的位数。
    pub fn write_u16(&mut self, samples: &mut [u8], value: u16) -> usize {
        value
            .to_be_bytes()
            .into_iter()
            .map(|byte| self.write_byte(samples, byte))
            .sum()
    }

    pub fn read_u16(&mut self, samples: &[u8]) -> u16 {
        u16::from_be_bytes([self.read_byte(samples), self.read_byte(samples)])
    }

    /// 以大端位序写入一个 `u32`，返回实际写入的位数。
    pub fn write_u32(&mut self, samples: &mut [u8], value: u32) -> usize {
        value
            .to_be_bytes()
            .into_iter()
            .map(|byte| self.write_byte(samples, byte))
            .sum()
    }

    /// 以大端位序读取一个 `u32`。
    pub fn read_u32(&mut self, samples: &[u8]) -> u32 {
        let mut bytes = [0u8; 4];
        bytes
            .iter_mut()
            .for_each(|byte| *byte = self.read_byte(samples));
        u32::from_be_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_rgb_in_row_major_order() {
        // 2x1 RGBA: R0 G0 B0 A0 R1 G1 B1 A1
        let mut cursor = BitCursor::new(2, 4);
        let order: Vec<usize> = std::iter::from_fn(|| cursor.next_index()).collect();
        assert_eq!(order, vec![0, 1, 2, 4, 5, 6]);
        assert_eq!(cursor.consumed(), 6);
    }

    #[test]
    fn writes_only_the_lsb() {
        let mut samples = [0xF0u8, 0xF1, 0x0E, 0xAA];
        let mut cursor = BitCursor::new(1, 4);
        assert!(cursor.write_bit(&mut samples, 1));
        assert!(cursor.write_bit(&mut samples, 0));
        assert!(cursor.write_bit(&mut samples, 1));
        assert!(!cursor.write_bit(&mut samples, 1));
        assert_eq!(samples, [0xF1, 0xF0, 0x0F, 0xAA]);
    }

    #[test]
    fn bytes_are_msb_first() {
        let mut samples = vec![0u8; 9];
        let mut cursor = BitCursor::new(3, 3);
        assert_eq!(cursor.write_byte(&mut samples, 0b0100_0001), 8);
        assert_eq!(samples, vec![0, 1, 0, 0, 0, 0, 0, 1, 0]);

        let mut cursor = BitCursor::new(3, 3);
        assert_eq!(cursor.read_byte(&samples), 0x41);
    }

    #[test]
    fn truncated_writes_report_bits_written() {
        let mut samples = [0xFFu8; 3];
        let mut cursor = BitCursor::new(1, 3);
        assert_eq!(cursor.write_u32(&mut samples, 0), 3);
        assert_eq!(samples, [0xFE; 3]);

        let mut cursor = BitCursor::new(1, 3);
        assert_eq!(cursor.read_u32(&samples), 0);
    }

    #[test]
    fn u32_round_trip() {
        let mut samples = vec![0x55u8; 33];
        let mut cursor = BitCursor::new(11, 3);
        assert_eq!(cursor.write_u32(&mut samples, 0xDEAD_BEEF), 32);

        let mut cursor = BitCursor::new(11, 3);
        assert_eq!(cursor.read_u32(&samples), 0xDEAD_BEEF);
        // 第 33 个样本未被触碰
        assert_eq!(samples[32], 0x55);
    }

    #[test]
    fn u16_is_big_endian() {
        let mut samples = vec![0u8; 18];
        let mut cursor = BitCursor::new(6, 3);
        assert_eq!(cursor.write_u16(&mut samples, 0x0102), 16);
        assert_eq!(&samples[..16], &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0]);

        let mut cursor = BitCursor::new(6, 3);
        assert_eq!(cursor.read_u16(&samples), 0x0102);
    }
}
