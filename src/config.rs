// src/config.rs

pub mod token;

use self::token::load_or_create_external_config;
use crate::{
    cli::Cli,
    constants,
    error::AppResult,
    models::api::{ThumbFormat, ThumbSize},
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub api_base: Option<String>,
    pub content_base: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DropboxConfig {
    pub root: Option<String>,
    pub file_limit: Option<u32>,
    pub include_deleted: Option<bool>,
    pub thumb_size: Option<ThumbSize>,
    pub thumb_format: Option<ThumbFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub dropbox: DropboxConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为网络配置提供一组稳健的默认值; 不做自动重试
        let network = NetworkConfig {
            api_base: Some(constants::DEFAULT_API_BASE.into()),
            content_base: Some(constants::DEFAULT_CONTENT_BASE.into()),
            connect_timeout_secs: Some(10),
            timeout_secs: Some(60),
            max_retries: Some(0),
        };
        let dropbox = DropboxConfig {
            root: Some(constants::DEFAULT_ROOT.into()),
            file_limit: Some(constants::METADATA_FILE_LIMIT),
            include_deleted: Some(true),
            thumb_size: Some(ThumbSize::default()),
            thumb_format: Some(ThumbFormat::default()),
        };

        Self {
            accesstoken: None,
            network,
            dropbox,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub content_base: String,
    pub root: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub file_limit: u32,
    pub include_deleted: bool,
    pub thumb_size: ThumbSize,
    pub thumb_format: ThumbFormat,
    pub cache_dir: PathBuf,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Ok(Self::from_external(external_config, args))
    }

    pub(crate) fn from_external(external_config: ExternalConfig, args: &Cli) -> Self {
        let network = external_config.network;
        let dropbox = external_config.dropbox;

        Self {
            api_base: network
                .api_base
                .unwrap_or_else(|| constants::DEFAULT_API_BASE.into()),
            content_base: network
                .content_base
                .unwrap_or_else(|| constants::DEFAULT_CONTENT_BASE.into()),
            root: dropbox.root.unwrap_or_else(|| constants::DEFAULT_ROOT.into()),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(60)),
            max_retries: network.max_retries.unwrap_or(0),
            file_limit: dropbox.file_limit.unwrap_or(constants::METADATA_FILE_LIMIT),
            include_deleted: dropbox.include_deleted.unwrap_or(true),
            thumb_size: args
                .size
                .or(dropbox.thumb_size)
                .unwrap_or_default(),
            thumb_format: args
                .format
                .or(dropbox.thumb_format)
                .unwrap_or_default(),
            cache_dir: args.cache_dir.clone().unwrap_or_else(default_cache_dir),
        }
    }
}

/// 系统缓存目录下的程序子目录，取不到时回退到临时目录
pub fn default_cache_dir() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join(constants::CACHE_DIR_NAME),
        None => {
            warn!("无法获取系统缓存目录，改用临时目录");
            std::env::temp_dir().join(constants::CACHE_DIR_NAME)
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            content_base: constants::DEFAULT_CONTENT_BASE.to_string(),
            root: constants::DEFAULT_ROOT.to_string(),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            file_limit: constants::METADATA_FILE_LIMIT,
            include_deleted: true,
            thumb_size: ThumbSize::default(),
            thumb_format: ThumbFormat::default(),
            cache_dir: std::env::temp_dir().join(constants::CACHE_DIR_NAME),
        }
    }
}
