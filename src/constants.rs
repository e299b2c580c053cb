//! # 常量模块
//!
//! 帧格式、容量计算以及命令行默认路径所共用的常量。

/// 长度头所占的位数。
/// 长度以 `u32` 大端位序写入，每个可用通道存储 1 bit，
/// 因此长度头占用前 32 个被访问的 R/G/B 通道。
pub const HEADER_BITS: usize = 32;

/// 校验帧在长度头之后追加的修订号所占的位数。
pub const REVISION_BITS: usize = 16;

/// 校验帧在修订号之后追加的 CRC-32 所占的位数。
pub const CHECKSUM_BITS: usize = 32;

/// 每个像素中参与隐写的通道数 (R, G, B)。alpha 通道永远不会被读写。
pub const USABLE_CHANNELS: usize = 3;

/// 长度头的最高位，用作帧格式标志。
/// 置位表示长度头之后紧跟修订号与 CRC-32 校验值。
/// 只有按校验帧配置的编解码器会这样解读它。
pub const FORMAT_FLAG: u32 = 1 << 31;

/// 单个帧可携带的最大负载字节数。
/// 长度头的最高位被格式标志占用，所以普通帧的长度永远不会触及它。
pub const MAX_PAYLOAD_LEN: usize = (FORMAT_FLAG - 1) as usize;

/// 清除最低有效位的掩码。
pub const LSB_CLEAR_MASK: u8 = 0xFE;

/// 只保留最低有效位的掩码。
pub const LSB_KEEP_MASK: u8 = 0x01;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 隐写结果图像的默认扩展名 (必须是无损格式)。
pub const HIDDEN_IMAGE_EXTENSION: &str = "png";

/// 未指定输出路径时，恢复出的负载文件名前缀。
pub const RECOVERED_PAYLOAD_PREFIX: &str = "recovered_";

/// 恢复出的负载文件的默认扩展名。
pub const RECOVERED_PAYLOAD_EXTENSION: &str = "txt";
