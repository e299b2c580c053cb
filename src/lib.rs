//! # lsb_postcard 库
//!
//! 把任意字节负载藏进无压缩像素缓冲区 R/G/B 通道的最低有效位，并在之后原样取回。
//!
//! 核心 ([`capacity`]、[`codec`]) 只操作调用者提供的 [`PixelBuffer`]，
//! 不涉及任何图像文件格式；[`cli`] 与 [`handler`] 是基于 `image` crate 的命令行外壳。
//!
//! ```
//! use lsb_postcard::{embed, extract, PixelBuffer};
//!
//! let mut samples = vec![0u8; 4 * 4 * 3];
//! let mut buffer = PixelBuffer::new(4, 4, 3, &mut samples[..])?;
//! embed(&mut buffer, b"AB")?;
//! assert_eq!(extract(&buffer)?, b"AB".to_vec());
//! # Ok::<(), lsb_postcard::LsbError>(())
//! ```

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
mod cursor;
pub mod error;
pub mod frame;
pub mod handler;
pub mod pixel_buffer;

pub use codec::LsbCodec;
pub use error::{EmbedError, ExtractError, LsbError};
pub use frame::{FrameFormat, FrameHeader};
pub use pixel_buffer::PixelBuffer;

/// 以普通帧把 `payload` 嵌入 `buffer`。见 [`LsbCodec::embed`]。
pub fn embed<S>(buffer: &mut PixelBuffer<S>, payload: &[u8]) -> Result<(), EmbedError>
where
    S: AsRef<[u8]> + AsMut<[u8]>,
{
    LsbCodec::new().embed(buffer, payload)
}

/// 以普通帧从 `buffer` 中提取负载，长度字的 32 位全部视为长度。见 [`LsbCodec::extract`]。
pub fn extract<S: AsRef<[u8]>>(buffer: &PixelBuffer<S>) -> Result<Vec<u8>, ExtractError> {
    LsbCodec::new().extract(buffer)
}
