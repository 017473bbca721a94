// src/thumbnail/mod.rs

pub mod selection;
mod task;
mod transfer;
mod view;

pub use task::{TaskHandle, TaskOptions, TaskOutcome, ThumbnailTask};
pub use transfer::Transfer;
pub use view::{ThumbnailView, present};

pub use crate::models::{SelectionMode, TaskState, Thumbnail, ThumbnailSlots, TransferProgress};
pub use crate::utils::progress_percent;
