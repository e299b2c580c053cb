//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `inspect` 子命令的高级业务逻辑。
//! 本模块负责图像文件的解码与编码、调用隐写核心，以及向用户报告结果。
//! 隐写核心本身从不接触文件格式。

use crate::capacity;
use crate::cli::{HideArgs, InspectArgs, RecoverArgs};
use crate::constants::{
    HIDDEN_IMAGE_EXTENSION, HIDDEN_IMAGE_PREFIX, RECOVERED_PAYLOAD_EXTENSION,
    RECOVERED_PAYLOAD_PREFIX,
};
use crate::{FrameFormat, LsbCodec, PixelBuffer};
use anyhow::{Context, Result};
use colored::Colorize;
use image::ColorType;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责解码图像、读取负载文件、检查隐写空间是否足够、调用核心嵌入负载，
/// 最后把结果编码写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与帧格式选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入图像，或无法读取负载文件。
/// * 图像没有足够的空间来隐藏负载。
/// * 无法编码或写入目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_path(&args.image));
    ensure_can_write(&dest, args.force)?;

    let (mut carrier, color) = decode_carrier(&args.image)?;

    let payload = fs::read(&args.payload).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    let format = if args.checksum {
        FrameFormat::Checked
    } else {
        FrameFormat::Plain
    };
    let codec = LsbCodec::with_format(format).with_revision(args.revision.unwrap_or_default());

    let available = capacity::max_payload_bytes_for(&carrier, format)?;
    anyhow::ensure!(
        capacity::fits_for(&carrier, payload.len(), format)?,
        "Not enough space in the image to hide the payload. \nRequired: {}, Available: {}",
        payload.len().to_string().red().bold(),
        available.to_string().green().bold()
    );

    codec.embed(&mut carrier, &payload).with_context(|| {
        format!(
            "Failed to hide the payload in '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    encode_carrier(&carrier, color, &dest)?;

    println!(
        "The payload ({} bytes) has been successfully hidden and saved: {}",
        payload.len().to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责解码经过隐写的图像、调用核心提取负载，最后把负载写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入图像。
/// * 图像中没有可信的帧，或校验帧的 CRC-32 不符。
///
/// 普通帧与校验帧都能恢复，无需指定格式。
/// * 无法写入目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .payload
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_can_write(&dest, args.force)?;

    let (carrier, _) = decode_carrier(&args.image)?;

    let payload = reading_codec().extract(&carrier).with_context(|| {
        format!(
            "Failed to recover the payload from '{}'. \nThe image may not contain a hidden payload or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &payload).with_context(|| {
        format!(
            "Unable to write to target payload file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload ({} bytes) has been successfully recovered and saved: {}",
        payload.len().to_string().green(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Inspect' 命令：打印图像尺寸、两种帧格式下的容量，以及读到的帧头。
///
/// 找不到可信的帧不算错误，只会如实报告。
pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let (carrier, color) = decode_carrier(&args.image)?;

    println!(
        "Image: {} ({}x{}, {:?})",
        args.image.to_string_lossy().bold(),
        carrier.width(),
        carrier.height(),
        color
    );
    println!(
        "Capacity: {} bytes (plain frame), {} bytes (checked frame)",
        capacity::max_payload_bytes(&carrier)?.to_string().green(),
        capacity::max_payload_bytes_for(&carrier, FrameFormat::Checked)?
            .to_string()
            .green()
    );

    match reading_codec().inspect(&carrier) {
        Ok(header) => match header.revision() {
            Some(revision) => println!(
                "Frame: {:?}, revision {}, {} payload bytes",
                header.format(),
                revision,
                header.payload_len().to_string().green().bold()
            ),
            None => println!(
                "Frame: {:?}, {} payload bytes",
                header.format(),
                header.payload_len().to_string().green().bold()
            ),
        },
        Err(err) => println!("Frame: {} ({})", "none found".yellow(), err),
    }

    Ok(())
}

/// 读取图像时使用的编解码器。普通帧从不置位格式标志，所以校验编解码器两种帧都能读。
fn reading_codec() -> LsbCodec {
    LsbCodec::with_format(FrameFormat::Checked)
}

/// 解码图像文件，得到 RGB8 或 RGBA8 的像素缓冲区。
/// 源图像带 alpha 时保留 alpha，以便写回时原样保存。
fn decode_carrier(path: &Path) -> Result<(PixelBuffer<Vec<u8>>, ColorType)> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let (color, samples) = if image.color().has_alpha() {
        (ColorType::Rgba8, image.to_rgba8().into_raw())
    } else {
        (ColorType::Rgb8, image.to_rgb8().into_raw())
    };
    info!(
        "decoded {} as {}x{} {:?} (source {:?})",
        path.display(),
        image.width(),
        image.height(),
        color,
        image.color()
    );

    let buffer = PixelBuffer::new(image.width(), image.height(), color.channel_count(), samples)?;
    Ok((buffer, color))
}

/// 把像素缓冲区编码为图像文件，格式由目标路径的扩展名决定。
fn encode_carrier(buffer: &PixelBuffer<Vec<u8>>, color: ColorType, dest: &Path) -> Result<()> {
    image::save_buffer(dest, buffer.samples(), buffer.width(), buffer.height(), color)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })
}

/// 覆盖保护：目标已存在且未指定 `--force` 时拒绝执行。
fn ensure_can_write(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/original.bmp` -> `dir/doctored_original.png`
pub fn default_hidden_path(image: &Path) -> PathBuf {
    image.with_file_name(format!(
        "{HIDDEN_IMAGE_PREFIX}{}.{HIDDEN_IMAGE_EXTENSION}",
        file_stem(image)
    ))
}

/// `dir/doctored_original.png` -> `dir/recovered_doctored_original.txt`
pub fn default_recovered_path(image: &Path) -> PathBuf {
    image.with_file_name(format!(
        "{RECOVERED_PAYLOAD_PREFIX}{}.{RECOVERED_PAYLOAD_EXTENSION}",
        file_stem(image)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_next_to_the_image() {
        let image = Path::new("some/dir/original.bmp");
        assert_eq!(
            default_hidden_path(image),
            PathBuf::from("some/dir/doctored_original.png")
        );
        assert_eq!(
            default_recovered_path(&default_hidden_path(image)),
            PathBuf::from("some/dir/recovered_doctored_original.txt")
        );
    }

    #[test]
    fn overwrite_protection() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("exists.png");
        fs::write(&existing, b"x").unwrap();

        assert!(ensure_can_write(&existing, false).is_err());
        assert!(ensure_can_write(&existing, true).is_ok());
        assert!(ensure_can_write(&dir.path().join("fresh.png"), false).is_ok());
    }
}
