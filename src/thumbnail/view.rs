// src/thumbnail/view.rs

use super::task::TaskOutcome;
use crate::models::Thumbnail;
use log::warn;

/// 接收任务结果的界面。任务本身不依赖任何具体的 UI 实现。
pub trait ThumbnailView {
    /// 进度百分比 (0-100)
    fn show_progress(&mut self, percent: u8);

    fn dismiss_progress(&mut self);

    fn set_thumbnail(&mut self, slot: usize, thumbnail: &Thumbnail);

    /// 短暂显示的提示信息
    fn show_message(&mut self, message: &str);

    /// 会话未认证时调用，此时没有提示文案
    fn on_unlinked(&mut self) {}
}

/// 任务结束后更新界面: 关闭进度、填充槽位、失败时显示提示
pub fn present<V: ThumbnailView + ?Sized>(outcome: &TaskOutcome, view: &mut V) {
    view.dismiss_progress();
    for (slot, thumbnail) in outcome.slots.iter().enumerate() {
        if let Some(thumbnail) = thumbnail {
            view.set_thumbnail(slot, thumbnail);
        }
    }
    if let Some(error) = &outcome.error {
        match error.user_message() {
            Some(message) => view.show_message(&message),
            None => {
                warn!("任务失败且没有提示文案: {}", error);
                view.on_unlinked();
            }
        }
    }
}
