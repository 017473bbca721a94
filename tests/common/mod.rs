// tests/common/mod.rs

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use dbroulette::{
    dropbox::{ContentStream, MetadataRequest, RemoteStore},
    error::{AppError, AppResult},
    models::{
        Thumbnail,
        api::{Entry, ThumbFormat, ThumbSize},
    },
    thumbnail::{SelectionMode, TaskOptions, ThumbnailView},
};
use futures::{StreamExt, stream};
use std::{
    collections::HashMap,
    io::Cursor,
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio_util::sync::CancellationToken;

/// 生成一张小的 PNG 图片
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn file_entry(path: &str, thumb: bool) -> Entry {
    Entry {
        path: path.to_string(),
        bytes: 1024,
        thumb_exists: thumb,
        ..Default::default()
    }
}

pub fn folder_entry(path: &str, contents: Vec<Entry>) -> Entry {
    Entry {
        path: path.to_string(),
        is_dir: true,
        contents: Some(contents),
        ..Default::default()
    }
}

pub fn options(cache_dir: &Path, mode: SelectionMode) -> TaskOptions {
    TaskOptions {
        cache_dir: cache_dir.to_path_buf(),
        thumb_size: ThumbSize::default(),
        thumb_format: ThumbFormat::default(),
        mode,
        file_limit: 1000,
        include_deleted: true,
    }
}

/// 内存中的远程存储
pub struct FakeStore {
    listing: Mutex<Option<AppResult<Entry>>>,
    thumbnails: HashMap<String, Vec<u8>>,
    chunk_size: usize,
    stall_after_first_chunk: bool,
    extra_declared_bytes: u64,
    pub metadata_calls: AtomicUsize,
    pub thumbnail_calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new(listing: AppResult<Entry>) -> Self {
        Self {
            listing: Mutex::new(Some(listing)),
            thumbnails: HashMap::new(),
            chunk_size: 64,
            stall_after_first_chunk: false,
            extra_declared_bytes: 0,
            metadata_calls: AtomicUsize::new(0),
            thumbnail_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_thumbnail(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.thumbnails.insert(path.to_string(), bytes);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// 发送第一块数据后不再有数据，模拟卡住的传输
    pub fn stalling(mut self) -> Self {
        self.stall_after_first_chunk = true;
        self
    }

    /// Content-Length 比实际发送的字节多 `extra` 字节，模拟提前断开的响应
    pub fn truncated_by(mut self, extra: u64) -> Self {
        self.extra_declared_bytes = extra;
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.thumbnail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn metadata(&self, _request: &MetadataRequest) -> AppResult<Entry> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.listing
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(AppError::Other(anyhow!("FakeStore 的目录列表只能取一次"))))
    }

    async fn thumbnail(
        &self,
        path: &str,
        _size: ThumbSize,
        _format: ThumbFormat,
    ) -> AppResult<ContentStream> {
        self.thumbnail_calls.lock().unwrap().push(path.to_string());
        let data = self
            .thumbnails
            .get(path)
            .cloned()
            .unwrap_or_else(|| png_bytes(2, 2));
        let content_length = Some(data.len() as u64 + self.extra_declared_bytes);
        let chunks: Vec<AppResult<Vec<u8>>> =
            data.chunks(self.chunk_size).map(|c| Ok(c.to_vec())).collect();
        let chunks = if self.stall_after_first_chunk {
            stream::iter(chunks.into_iter().take(1))
                .chain(stream::pending())
                .boxed()
        } else {
            stream::iter(chunks).boxed()
        };
        Ok(ContentStream {
            content_length,
            chunks,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Progress(u8),
    Dismissed,
    Slot(usize, String),
    Message(String),
    Unlinked,
}

/// 记录所有回调的界面
#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    pub cancel_on_progress: Option<CancellationToken>,
}

impl RecordingView {
    pub fn canceling(token: CancellationToken) -> Self {
        Self {
            events: Vec::new(),
            cancel_on_progress: Some(token),
        }
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn slots(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Slot(i, _) => Some(*i),
                _ => None,
            })
            .collect()
    }
}

impl ThumbnailView for RecordingView {
    fn show_progress(&mut self, percent: u8) {
        self.events.push(ViewEvent::Progress(percent));
        if percent > 0 {
            if let Some(token) = &self.cancel_on_progress {
                token.cancel();
            }
        }
    }

    fn dismiss_progress(&mut self) {
        self.events.push(ViewEvent::Dismissed);
    }

    fn set_thumbnail(&mut self, slot: usize, thumbnail: &Thumbnail) {
        self.events.push(ViewEvent::Slot(slot, thumbnail.entry.path.clone()));
    }

    fn show_message(&mut self, message: &str) {
        self.events.push(ViewEvent::Message(message.to_string()));
    }

    fn on_unlinked(&mut self) {
        self.events.push(ViewEvent::Unlinked);
    }
}
