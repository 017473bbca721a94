// src/cli.rs

use crate::models::api::{ThumbFormat, ThumbSize};
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["path", "login", "token_help"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 从指定的 Dropbox 文件夹随机下载缩略图 (例如 '/' 或 '/Photos')
    #[arg(short, long, value_name = "FOLDER", help_heading = "Mode")]
    pub path: Option<String>,
    /// 输入 Access Token 并保存到本地配置文件
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub login: bool,
    /// 显示如何获取 Access Token 的指南并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub token_help: bool,

    // --- 下载选项 (Options) ---
    /// 提供访问令牌 (Access Token)，优先级最高
    #[arg(long, help_heading = "Options")]
    pub token: Option<String>,
    /// 随机下载的缩略图数量 (1-3)，大于 1 时各张互不相同
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3), help_heading = "Options")]
    pub slots: u8,
    /// 缩略图尺寸预设
    #[arg(long, value_enum, help_heading = "Options")]
    pub size: Option<ThumbSize>,
    /// 缩略图格式
    #[arg(long, value_enum, help_heading = "Options")]
    pub format: Option<ThumbFormat>,
    /// 缓存目录 (默认使用系统缓存目录)
    #[arg(long, value_name = "DIR", help_heading = "Options")]
    pub cache_dir: Option<PathBuf>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
