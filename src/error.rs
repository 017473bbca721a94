// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("目标不是文件夹或文件夹为空: {0}")]
    NotAFolder(String),
    #[error("文件夹中没有可生成缩略图的文件: {0}")]
    NoThumbnails(String),
    #[error("无法创建本地缓存文件 '{path}': {source}")]
    LocalFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("会话未认证或已解除关联")]
    Unlinked,
    #[error("用户取消")]
    Canceled,
    #[error("传输不完整 (预期 {expected} 字节, 实际 {received} 字节)")]
    PartialFile { expected: u64, received: u64 },
    #[error("服务器返回错误 {status}: {}", .body.error.as_deref().unwrap_or("<无详情>"))]
    Server {
        status: StatusCode,
        body: crate::models::api::ErrorBody,
    },
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("图片解码失败: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// 错误分类，调用方据此决定提示文案与是否重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotAFolder,
    NoThumbnails,
    LocalFile,
    Unlinked,
    Canceled,
    PartialFile,
    NotModified,
    Forbidden,
    NotFound,
    TooManyEntries,
    UnsupportedMedia,
    QuotaExceeded,
    OtherServer,
    Transport,
    Parse,
    Unknown,
}

pub const MSG_NOT_A_FOLDER: &str = "File or empty directory";
pub const MSG_NO_THUMBNAILS: &str = "No pictures in that directory";
pub const MSG_LOCAL_FILE: &str = "Couldn't create a local file to store the image";
pub const MSG_CANCELED: &str = "Canceled";
pub const MSG_PARTIAL_FILE: &str = "Download canceled";
pub const MSG_NETWORK: &str = "Network error. Try again.";
pub const MSG_PARSE: &str = "Dropbox error. Try again.";
pub const MSG_UNKNOWN: &str = "Unknown error. Try again.";

impl ErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ErrorKind::Unlinked,
            StatusCode::NOT_MODIFIED => ErrorKind::NotModified,
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::NOT_ACCEPTABLE => ErrorKind::TooManyEntries,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ErrorKind::UnsupportedMedia,
            StatusCode::INSUFFICIENT_STORAGE => ErrorKind::QuotaExceeded,
            _ => ErrorKind::OtherServer,
        }
    }

    /// 网络抖动与服务端重启导致的解析失败适合重试，但本程序从不自动重试。
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Parse)
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotAFolder(_) => ErrorKind::NotAFolder,
            AppError::NoThumbnails(_) => ErrorKind::NoThumbnails,
            AppError::LocalFile { .. } => ErrorKind::LocalFile,
            AppError::Unlinked => ErrorKind::Unlinked,
            AppError::Canceled => ErrorKind::Canceled,
            AppError::PartialFile { .. } => ErrorKind::PartialFile,
            AppError::Server { status, .. } => ErrorKind::from_status(*status),
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if let Some(status) = err.status() {
                    ErrorKind::from_status(status)
                } else if err.is_decode() {
                    ErrorKind::Parse
                } else {
                    ErrorKind::Transport
                }
            }
            AppError::NetworkMiddleware(_) => ErrorKind::Transport,
            AppError::Json(_) | AppError::ApiParseFailed { .. } => ErrorKind::Parse,
            _ => ErrorKind::Unknown,
        }
    }

    /// 面向用户的提示文案。未认证的会话没有提示文案。
    pub fn user_message(&self) -> Option<String> {
        let msg = match self.kind() {
            ErrorKind::NotAFolder => MSG_NOT_A_FOLDER,
            ErrorKind::NoThumbnails => MSG_NO_THUMBNAILS,
            ErrorKind::LocalFile => MSG_LOCAL_FILE,
            ErrorKind::Unlinked => return None,
            ErrorKind::Canceled => MSG_CANCELED,
            ErrorKind::PartialFile => MSG_PARTIAL_FILE,
            ErrorKind::Transport => MSG_NETWORK,
            ErrorKind::Parse => MSG_PARSE,
            ErrorKind::Unknown => MSG_UNKNOWN,
            _ => {
                // 服务端错误: 优先使用已本地化的 user_error
                return Some(match self {
                    AppError::Server { body, .. } => body
                        .user_error
                        .clone()
                        .or_else(|| body.error.clone())
                        .unwrap_or_else(|| MSG_UNKNOWN.to_string()),
                    _ => MSG_UNKNOWN.to_string(),
                });
            }
        };
        Some(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::ErrorBody;

    fn server(status: StatusCode, error: Option<&str>, user_error: Option<&str>) -> AppError {
        AppError::Server {
            status,
            body: ErrorBody {
                error: error.map(String::from),
                user_error: user_error.map(String::from),
            },
        }
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            AppError::NotAFolder("/a".into()).user_message().as_deref(),
            Some("File or empty directory")
        );
        assert_eq!(
            AppError::NoThumbnails("/a".into()).user_message().as_deref(),
            Some("No pictures in that directory")
        );
        assert_eq!(AppError::Canceled.user_message().as_deref(), Some("Canceled"));
        assert_eq!(
            AppError::PartialFile { expected: 10, received: 3 }
                .user_message()
                .as_deref(),
            Some("Download canceled")
        );
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            AppError::Json(parse_err).user_message().as_deref(),
            Some("Dropbox error. Try again.")
        );
    }

    #[test]
    fn test_unlinked_is_silent() {
        assert_eq!(AppError::Unlinked.user_message(), None);
        assert_eq!(
            server(StatusCode::UNAUTHORIZED, Some("bad token"), None).kind(),
            ErrorKind::Unlinked
        );
        assert_eq!(
            server(StatusCode::UNAUTHORIZED, Some("bad token"), None).user_message(),
            None
        );
    }

    #[test]
    fn test_server_message_extraction() {
        // user_error 优先，其次 error，最后通用文案
        let e = server(StatusCode::NOT_FOUND, Some("Path not found"), Some("找不到该路径"));
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert_eq!(e.user_message().as_deref(), Some("找不到该路径"));

        let e = server(StatusCode::INSUFFICIENT_STORAGE, Some("Over quota"), None);
        assert_eq!(e.kind(), ErrorKind::QuotaExceeded);
        assert_eq!(e.user_message().as_deref(), Some("Over quota"));

        let e = server(StatusCode::BAD_GATEWAY, None, None);
        assert_eq!(e.kind(), ErrorKind::OtherServer);
        assert_eq!(e.user_message().as_deref(), Some("Unknown error. Try again."));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(StatusCode::NOT_MODIFIED), ErrorKind::NotModified);
        assert_eq!(ErrorKind::from_status(StatusCode::FORBIDDEN), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(StatusCode::NOT_ACCEPTABLE), ErrorKind::TooManyEntries);
        assert_eq!(
            ErrorKind::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE),
            ErrorKind::UnsupportedMedia
        );
        assert!(ErrorKind::Transport.is_retryable());
        assert!(ErrorKind::Parse.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
    }

    #[test]
    fn test_local_file_and_unknown() {
        let e = AppError::LocalFile {
            path: "/nope/x".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(
            e.user_message().as_deref(),
            Some("Couldn't create a local file to store the image")
        );
        let e = AppError::Io(std::io::Error::other("boom"));
        assert_eq!(e.kind(), ErrorKind::Unknown);
        assert_eq!(e.user_message().as_deref(), Some("Unknown error. Try again."));
    }
}
