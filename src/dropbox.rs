// src/dropbox.rs

use crate::{
    client::RobustClient,
    error::*,
    models::api::{Entry, ThumbFormat, ThumbSize},
    utils,
};
use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};
use log::{debug, info};
use url::Url;

/// 元数据请求参数
#[derive(Debug, Clone)]
pub struct MetadataRequest {
    pub path: String,
    pub file_limit: u32,
    pub hash: Option<String>,
    pub list: bool,
    pub include_deleted: bool,
    pub rev: Option<String>,
}

impl MetadataRequest {
    pub fn listing(path: &str, file_limit: u32, include_deleted: bool) -> Self {
        Self {
            path: path.to_string(),
            file_limit,
            hash: None,
            list: true,
            include_deleted,
            rev: None,
        }
    }
}

/// 正在传输的缩略图内容
pub struct ContentStream {
    pub content_length: Option<u64>,
    pub chunks: BoxStream<'static, AppResult<Vec<u8>>>,
}

/// 远程存储的最小接口: 列目录 + 拉取缩略图
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn metadata(&self, request: &MetadataRequest) -> AppResult<Entry>;

    async fn thumbnail(
        &self,
        path: &str,
        size: ThumbSize,
        format: ThumbFormat,
    ) -> AppResult<ContentStream>;
}

pub struct DropboxClient {
    http: RobustClient,
}

impl DropboxClient {
    pub fn new(http: RobustClient) -> Self {
        Self { http }
    }

    fn build_url(&self, base: &str, action: &str, path: &str) -> AppResult<Url> {
        let root = &self.http.config().root;
        let url = format!(
            "{}/{}/{}{}",
            base.trim_end_matches('/'),
            action,
            root,
            utils::encode_remote_path(path)
        );
        Ok(Url::parse(&url)?)
    }

    pub fn metadata_url(&self, request: &MetadataRequest) -> AppResult<Url> {
        let mut url = self.build_url(&self.http.config().api_base, "metadata", &request.path)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("file_limit", &request.file_limit.to_string())
                .append_pair("list", &request.list.to_string())
                .append_pair("include_deleted", &request.include_deleted.to_string());
            if let Some(hash) = &request.hash {
                query.append_pair("hash", hash);
            }
            if let Some(rev) = &request.rev {
                query.append_pair("rev", rev);
            }
        }
        Ok(url)
    }

    pub fn thumbnail_url(&self, path: &str, size: ThumbSize, format: ThumbFormat) -> AppResult<Url> {
        let mut url = self.build_url(&self.http.config().content_base, "thumbnails", path)?;
        url.query_pairs_mut()
            .append_pair("size", size.as_query())
            .append_pair("format", format.as_query());
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for DropboxClient {
    async fn metadata(&self, request: &MetadataRequest) -> AppResult<Entry> {
        let url = self.metadata_url(request)?;
        info!("获取目录元数据: {}", request.path);
        let res = self.http.get(url.clone()).await?;
        let text = res.text().await?;
        let entry: Entry = serde_json::from_str(&text).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })?;
        debug!(
            "元数据: path={}, is_dir={}, 条目数={:?}",
            entry.path,
            entry.is_dir,
            entry.contents.as_ref().map(Vec::len)
        );
        Ok(entry)
    }

    async fn thumbnail(
        &self,
        path: &str,
        size: ThumbSize,
        format: ThumbFormat,
    ) -> AppResult<ContentStream> {
        let url = self.thumbnail_url(path, size, format)?;
        info!("下载缩略图: {} ({}, {})", path, size.as_query(), format);
        let res = self.http.get(url).await?;
        let content_length = res.content_length();
        let chunks = res
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(AppError::from))
            .boxed();
        Ok(ContentStream {
            content_length,
            chunks,
        })
    }
}

#[cfg(all(test, feature = "testing"))]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::sync::Arc;

    fn client() -> DropboxClient {
        let config = AppConfig {
            api_base: "https://api.example.com/1/".into(),
            content_base: "https://content.example.com/1".into(),
            ..AppConfig::default()
        };
        let http = RobustClient::new(Arc::new(config), Some("t".into())).unwrap();
        DropboxClient::new(http)
    }

    #[test]
    fn test_metadata_url() {
        let url = client()
            .metadata_url(&MetadataRequest::listing("/My Photos", 1000, true))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/1/metadata/auto/My%20Photos?file_limit=1000&list=true&include_deleted=true"
        );
    }

    #[test]
    fn test_root_metadata_url() {
        let url = client()
            .metadata_url(&MetadataRequest::listing("/", 10, false))
            .unwrap();
        assert_eq!(url.path(), "/1/metadata/auto");
    }

    #[test]
    fn test_thumbnail_url() {
        let url = client()
            .thumbnail_url("/Photos/a.jpg", ThumbSize::Bestfit960x640, ThumbFormat::Jpeg)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://content.example.com/1/thumbnails/auto/Photos/a.jpg?size=960x640_bestfit&format=JPEG"
        );
    }
}
