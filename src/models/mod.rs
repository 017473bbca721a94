// src/models/mod.rs

pub mod api;

use crate::symbols;
use api::Entry;
use colored::{ColoredString, Colorize};
use image::DynamicImage;
use std::path::PathBuf;

/// 一次任务最多填充的图片槽位数
pub const SLOT_COUNT: usize = 3;

/// 任务生命周期: Created → Running → {Succeeded, Canceled, Failed} → Finished
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TaskState {
    Created,
    Running,
    Succeeded,
    Canceled,
    Failed,
    Finished,
}

impl TaskState {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            TaskState::Succeeded => (&symbols::OK, |s| s.green(), "缩略图下载成功"),
            TaskState::Canceled => (&symbols::WARN, |s| s.yellow(), "任务已取消"),
            TaskState::Failed => (&symbols::ERROR, |s| s.red(), "任务失败"),
            TaskState::Finished => (&symbols::INFO, |s| s.cyan(), "任务结束"),
            TaskState::Created | TaskState::Running => {
                (&symbols::INFO, |s| s.cyan(), "任务进行中")
            }
        }
    }
}

/// 选择多少张缩略图
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum SelectionMode {
    /// 随机选一张，放入槽位 0
    #[default]
    Single,
    /// 随机选 n 张互不相同的 (n 不超过 SLOT_COUNT)
    Distinct(usize),
}

impl SelectionMode {
    pub fn from_slots(slots: usize) -> Self {
        match slots {
            0 | 1 => SelectionMode::Single,
            n => SelectionMode::Distinct(n.min(SLOT_COUNT)),
        }
    }

    pub fn wanted(&self) -> usize {
        match self {
            SelectionMode::Single => 1,
            SelectionMode::Distinct(n) => (*n).clamp(1, SLOT_COUNT),
        }
    }
}

/// 已解码、可直接显示的缩略图
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub entry: Entry,
    pub local_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub image: DynamicImage,
}

pub type ThumbnailSlots = [Option<Thumbnail>; SLOT_COUNT];

/// 传输过程中的字节进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes: u64,
    pub total: u64,
}

impl TransferProgress {
    pub fn percent(&self) -> u8 {
        crate::utils::progress_percent(self.bytes, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_mode_from_slots() {
        assert_eq!(SelectionMode::from_slots(0), SelectionMode::Single);
        assert_eq!(SelectionMode::from_slots(1), SelectionMode::Single);
        assert_eq!(SelectionMode::from_slots(2), SelectionMode::Distinct(2));
        assert_eq!(SelectionMode::from_slots(9), SelectionMode::Distinct(3));
        assert_eq!(SelectionMode::Distinct(0).wanted(), 1);
        assert_eq!(SelectionMode::Single.wanted(), 1);
    }
}
