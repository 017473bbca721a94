// src/thumbnail/transfer.rs

use crate::{
    dropbox::RemoteStore,
    error::*,
    models::{
        TransferProgress,
        api::{Entry, ThumbFormat, ThumbSize},
    },
};
use futures::StreamExt;
use log::{debug, info, warn};
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt, sync::mpsc::UnboundedSender};
use tokio_util::sync::CancellationToken;

/// 单次缩略图传输所需的参数
pub struct Transfer<'a> {
    pub store: &'a dyn RemoteStore,
    pub entry: &'a Entry,
    pub size: ThumbSize,
    pub format: ThumbFormat,
    pub cancel: &'a CancellationToken,
    pub progress: &'a UnboundedSender<TransferProgress>,
}

impl Transfer<'_> {
    /// 把缩略图写入 `dest`，返回写入的字节数。
    /// 取消时立即返回 `AppError::Canceled`，已写入的部分文件保留在原处。
    pub async fn run(&self, dest: &Path) -> AppResult<u64> {
        let mut file = File::create(dest).await.map_err(|source| AppError::LocalFile {
            path: dest.display().to_string(),
            source,
        })?;

        let content = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(AppError::Canceled),
            res = self.store.thumbnail(&self.entry.path, self.size, self.format) => res?,
        };

        // 期望长度优先取响应头，缺失时用原文件大小估算
        let total = content.content_length.unwrap_or(self.entry.bytes);
        debug!("开始写入 '{}'，期望 {} 字节", dest.display(), total);
        self.report(0, total);

        let mut chunks = content.chunks;
        let mut received: u64 = 0;
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!("传输 '{}' 在 {} 字节处被取消", self.entry.path, received);
                    return Err(AppError::Canceled);
                }
                next = chunks.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            self.report(received, total);
        }
        file.flush().await?;

        if let Some(expected) = content.content_length
            && received < expected
        {
            return Err(AppError::PartialFile { expected, received });
        }
        info!("缩略图已保存: {} ({} 字节)", dest.display(), received);
        Ok(received)
    }

    fn report(&self, bytes: u64, total: u64) {
        // 接收端已关闭时不再上报
        let _ = self.progress.send(TransferProgress { bytes, total });
    }
}
