// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod dropbox;
pub mod error;
pub mod models;
pub mod symbols;
pub mod thumbnail;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    dropbox::{DropboxClient, RemoteStore},
    error::AppResult,
};
use colored::*;
use log::{debug, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 一次运行所需的共享上下文
#[derive(Clone)]
pub struct RouletteContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RemoteStore>,
    pub args: Arc<Cli>,
    pub cancellation_token: CancellationToken,
}

/// 库的公共入口点，由 `main.rs` 调用。返回 `Ok(false)` 表示任务失败且已向用户提示。
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: CancellationToken) -> AppResult<bool> {
    debug!("CLI 参数: {:?}", args);
    if args.token_help {
        workflows::print_token_help();
        return Ok(true);
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let (token_opt, source) = config::token::resolve_token(args.token.as_deref());
    if token_opt.is_some() {
        info!("从 {} 加载 Access Token", source);
    } else if !args.login {
        info!("未找到 Access Token");
        println!(
            "\n{}",
            format!("{} 未找到 Access Token。", *symbols::INFO).yellow()
        );
    }

    let http_client = RobustClient::new(config.clone(), token_opt)?;
    let context = RouletteContext {
        config: config.clone(),
        store: Arc::new(DropboxClient::new(http_client)),
        args: args.clone(),
        cancellation_token,
    };

    if args.login {
        workflows::run_login(context).await
    } else if let Some(folder) = &args.path {
        workflows::run_fetch(context, folder).await
    } else {
        Ok(true)
    }
}
