//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，把任意文件藏进无损格式图像 (如 PNG, BMP) 的 RGB 通道中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，把任意文件藏进无损格式图像 (如 PNG, BMP) 的 RGB 通道中，并可原样恢复。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 inspect (查看)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏一个文件的内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文件。
    Recover(RecoverArgs),

    /// 显示图像的容量以及其中可能存在的帧头。
    Inspect(InspectArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径，内容按原始字节处理。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 结果图像的输出路径。默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 写入校验帧：长度头之后追加修订号与 CRC-32，提取时可以发现损坏。
    #[arg(short, long)]
    pub checksum: bool,

    /// 校验帧携带的修订号，默认为 0。
    #[arg(short, long, requires = "checksum")]
    pub revision: Option<u16>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的负载的保存路径。默认为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub payload: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'inspect' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// 要查看的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
