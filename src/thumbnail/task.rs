// src/thumbnail/task.rs

use super::{
    selection,
    transfer::Transfer,
    view::{ThumbnailView, present},
};
use crate::{
    config::AppConfig,
    dropbox::{MetadataRequest, RemoteStore},
    error::*,
    models::{
        SelectionMode, TaskState, Thumbnail, ThumbnailSlots, TransferProgress,
        api::{Entry, ThumbFormat, ThumbSize},
    },
    utils,
};
use anyhow::anyhow;
use log::{debug, error, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// 任务参数
#[derive(Debug, Clone)]
pub struct TaskOptions {
    pub cache_dir: PathBuf,
    pub thumb_size: ThumbSize,
    pub thumb_format: ThumbFormat,
    pub mode: SelectionMode,
    pub file_limit: u32,
    pub include_deleted: bool,
}

impl TaskOptions {
    pub fn from_config(config: &AppConfig, mode: SelectionMode) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            thumb_size: config.thumb_size,
            thumb_format: config.thumb_format,
            mode,
            file_limit: config.file_limit,
            include_deleted: config.include_deleted,
        }
    }
}

/// 一次任务的结果。`error` 存在时任务一定没有成功。
#[derive(Debug)]
pub struct TaskOutcome {
    pub state: TaskState,
    pub slots: ThumbnailSlots,
    pub error: Option<AppError>,
}

impl TaskOutcome {
    fn finish(slots: ThumbnailSlots, result: AppResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                state: TaskState::Succeeded,
                slots,
                error: None,
            },
            Err(e) => Self {
                state: if matches!(e, AppError::Canceled) {
                    TaskState::Canceled
                } else {
                    TaskState::Failed
                },
                slots,
                error: Some(e),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.state == TaskState::Succeeded
    }

    pub fn filled_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// 从 Dropbox 文件夹随机下载缩略图的一次性任务
pub struct ThumbnailTask {
    store: Arc<dyn RemoteStore>,
    folder: String,
    options: TaskOptions,
    rng: StdRng,
    cancel: CancellationToken,
    state: Arc<watch::Sender<TaskState>>,
}

impl ThumbnailTask {
    pub fn new(store: Arc<dyn RemoteStore>, folder: &str, options: TaskOptions) -> Self {
        let (state, _) = watch::channel(TaskState::Created);
        Self {
            store,
            folder: folder.to_string(),
            options,
            rng: StdRng::from_entropy(),
            cancel: CancellationToken::new(),
            state: Arc::new(state),
        }
    }

    /// 使用固定的随机源，便于复现选择结果
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// 使用外部的取消令牌 (例如绑定到 Ctrl+C)
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// 在后台启动任务。任务只能运行一次。
    pub fn spawn(self) -> TaskHandle {
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let cancel = self.cancel.clone();
        let state = self.state.clone();
        let join = tokio::spawn(self.run(progress_tx));
        TaskHandle {
            progress_rx,
            join,
            cancel,
            state,
        }
    }

    /// 直接在当前任务中执行，不上报进度
    pub async fn run_to_completion(self) -> TaskOutcome {
        let (progress_tx, _) = mpsc::unbounded_channel();
        self.run(progress_tx).await
    }

    async fn run(mut self, progress: mpsc::UnboundedSender<TransferProgress>) -> TaskOutcome {
        self.state.send_replace(TaskState::Running);
        info!("开始任务: 文件夹 '{}', 模式 {:?}", self.folder, self.options.mode);

        let mut slots: ThumbnailSlots = Default::default();
        let result = self.fetch(&mut slots, &progress).await;
        let outcome = TaskOutcome::finish(slots, result);

        match &outcome.error {
            None => info!("任务成功，填充了 {} 个槽位", outcome.filled_slots()),
            Some(AppError::Canceled) => warn!("任务被用户取消"),
            Some(e) => error!("任务失败 ({:?}): {}", e.kind(), e),
        }
        self.state.send_replace(outcome.state);
        outcome
    }

    async fn fetch(
        &mut self,
        slots: &mut ThumbnailSlots,
        progress: &mpsc::UnboundedSender<TransferProgress>,
    ) -> AppResult<()> {
        self.ensure_not_canceled()?;

        let request = MetadataRequest::listing(
            &self.folder,
            self.options.file_limit,
            self.options.include_deleted,
        );
        let listing = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(AppError::Canceled),
            res = self.store.metadata(&request) => res?,
        };

        let contents = selection::folder_contents(&listing)?;
        self.ensure_not_canceled()?;
        let candidates = selection::thumbnail_candidates(&listing, contents)?;
        let picked = selection::pick(&candidates, self.options.mode, &mut self.rng);
        debug!(
            "选中: {:?}",
            picked.iter().map(|e| e.path.as_str()).collect::<Vec<_>>()
        );

        for (slot, entry) in picked.into_iter().enumerate() {
            self.ensure_not_canceled()?;
            let local_path = self.cache_path(entry, slot).await?;
            let transfer = Transfer {
                store: self.store.as_ref(),
                entry,
                size: self.options.thumb_size,
                format: self.options.thumb_format,
                cancel: &self.cancel,
                progress,
            };
            transfer.run(&local_path).await?;
            self.ensure_not_canceled()?;
            slots[slot] = Some(decode_thumbnail(entry, &local_path).await?);
        }
        Ok(())
    }

    /// 单张模式直接使用路径第二段; 多张模式下同一子文件夹的条目会同名，按槽位区分
    async fn cache_path(&self, entry: &Entry, slot: usize) -> AppResult<PathBuf> {
        let local_file_error = |source: std::io::Error| AppError::LocalFile {
            path: entry.path.clone(),
            source,
        };
        let name = utils::cache_file_name(&entry.path).ok_or_else(|| {
            local_file_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "远程路径中没有可用的文件名",
            ))
        })?;
        let name = if self.options.mode.wanted() > 1 {
            utils::slot_file_name(&name, slot)
        } else {
            name
        };
        tokio::fs::create_dir_all(&self.options.cache_dir)
            .await
            .map_err(local_file_error)?;
        utils::secure_join_path(&self.options.cache_dir, &name)
    }

    fn ensure_not_canceled(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Canceled);
        }
        Ok(())
    }
}

/// 把缓存文件解码为可显示的图片，格式按文件内容识别
async fn decode_thumbnail(entry: &Entry, local_path: &Path) -> AppResult<Thumbnail> {
    let path = local_path.to_path_buf();
    let image = tokio::task::spawn_blocking(move || -> AppResult<image::DynamicImage> {
        Ok(image::ImageReader::open(&path)?
            .with_guessed_format()?
            .decode()?)
    })
    .await
    .map_err(|e| AppError::Other(anyhow!("解码线程异常退出: {}", e)))??;

    debug!(
        "解码完成: {} ({}x{})",
        local_path.display(),
        image.width(),
        image.height()
    );
    Ok(Thumbnail {
        entry: entry.clone(),
        local_path: local_path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        image,
    })
}

/// 后台任务的句柄。进度按产生顺序送达，且全部先于完成回调。
pub struct TaskHandle {
    progress_rx: mpsc::UnboundedReceiver<TransferProgress>,
    join: JoinHandle<TaskOutcome>,
    cancel: CancellationToken,
    state: Arc<watch::Sender<TaskState>>,
}

impl TaskHandle {
    /// 相当于进度对话框上的"取消"按钮
    pub fn cancel(&self) {
        info!("请求取消任务");
        self.cancel.cancel();
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    /// 等待任务结束，不更新任何界面
    pub async fn join(self) -> TaskOutcome {
        let Self { join, state, .. } = self;
        let outcome = Self::collect(join).await;
        state.send_replace(TaskState::Finished);
        outcome
    }

    /// 把进度转成百分比交给界面，任务结束后调用 `present`
    pub async fn drive<V: ThumbnailView + ?Sized>(mut self, view: &mut V) -> TaskOutcome {
        while let Some(update) = self.progress_rx.recv().await {
            view.show_progress(update.percent());
        }
        let outcome = Self::collect(self.join).await;
        present(&outcome, view);
        self.state.send_replace(TaskState::Finished);
        outcome
    }

    async fn collect(join: JoinHandle<TaskOutcome>) -> TaskOutcome {
        match join.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("后台任务异常退出: {}", e);
                TaskOutcome::finish(
                    Default::default(),
                    Err(AppError::Other(anyhow!("后台任务异常退出: {}", e))),
                )
            }
        }
    }
}
