// src/workflows.rs

use crate::{
    RouletteContext,
    config, constants,
    dropbox::{DropboxClient, MetadataRequest, RemoteStore},
    client::RobustClient,
    error::{AppError, AppResult},
    models::{SelectionMode, TaskState},
    symbols,
    thumbnail::{TaskOptions, ThumbnailTask},
    ui::{self, ConsoleView},
};
use colored::*;
use log::{error, info, warn};

/// 下载模式: 从 --path 指定的文件夹随机取缩略图。返回任务是否成功。
pub(crate) async fn run_fetch(context: RouletteContext, folder: &str) -> AppResult<bool> {
    let mode = SelectionMode::from_slots(usize::from(context.args.slots));
    let options = TaskOptions::from_config(&context.config, mode);
    ui::info(&format!(
        "从 Dropbox 文件夹 '{}' 随机选取 {} 张缩略图",
        folder,
        mode.wanted()
    ));

    let task = ThumbnailTask::new(context.store.clone(), folder, options)
        .with_cancellation_token(context.cancellation_token.clone());
    let handle = task.spawn();

    let mut view = ConsoleView::new();
    let outcome = handle.drive(&mut view).await;

    if view.was_unlinked() {
        // 会话未认证时任务本身不给出提示，这里补充操作指引
        ui::warn("Access Token 缺失或已失效。可使用 --login 重新输入，或运行 --token-help 查看获取方法。");
    }

    let (symbol, color_fn, summary) = outcome.state.get_display_info();
    match outcome.state {
        TaskState::Succeeded => {
            println!(
                "\n{} {}: {} 张，保存于 {}",
                symbol,
                color_fn(summary.into()),
                outcome.filled_slots(),
                dunce::simplified(&context.config.cache_dir).display()
            );
            Ok(true)
        }
        TaskState::Canceled => {
            eprintln!("\n{} {}", symbol, color_fn(summary.into()));
            Err(AppError::Canceled)
        }
        _ => {
            eprintln!("\n{} {}", symbol, color_fn(summary.into()));
            Ok(false)
        }
    }
}

/// 登录模式: 输入 Token，验证后保存到配置文件
pub(crate) async fn run_login(context: RouletteContext) -> AppResult<bool> {
    ui::box_message(
        "设置 Access Token",
        constants::HELP_TOKEN_GUIDE
            .lines()
            .collect::<Vec<_>>()
            .as_slice(),
        |s| s.cyan(),
    );
    loop {
        let token = match ui::prompt_hidden("请输入 Access Token (输入不可见，完成后按回车)") {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            Ok(_) => {
                println!("{}", "Token 不能为空。".yellow());
                continue;
            }
            Err(e) => {
                warn!("用户在 Token 提示处中断: {}", e);
                return Err(AppError::Canceled);
            }
        };

        info!("用户输入了新的 Token，正在验证...");
        match validate_token(&context, &token).await {
            Ok(()) => {
                let path = config::token::save_token(&token)?;
                println!(
                    "{} Token 已验证并保存至: {}",
                    *symbols::OK,
                    path.display()
                );
                return Ok(true);
            }
            Err(AppError::Unlinked) => {
                eprintln!("\n{} Token 无效，请重试。", *symbols::ERROR);
                if !ui::confirm("是否重新输入?", true) {
                    return Ok(false);
                }
            }
            Err(e) => {
                error!("验证 Token 时发生错误: {}", e);
                if ui::confirm(&format!("无法验证 Token ({})。仍然保存吗?", e), false) {
                    config::token::save_token(&token)?;
                    return Ok(true);
                }
                return Ok(false);
            }
        }
    }
}

/// 用一次轻量的元数据请求探测 Token 是否可用
async fn validate_token(context: &RouletteContext, token: &str) -> AppResult<()> {
    let http = RobustClient::new(context.config.clone(), Some(token.to_string()))?;
    let probe = DropboxClient::new(http);
    let request = MetadataRequest {
        list: false,
        ..MetadataRequest::listing(constants::DEFAULT_FOLDER, 1, false)
    };
    probe.metadata(&request).await.map(|_| ())
}

pub(crate) fn print_token_help() {
    ui::box_message(
        "获取 Access Token 指南",
        constants::HELP_TOKEN_GUIDE
            .lines()
            .collect::<Vec<_>>()
            .as_slice(),
        |s| s.cyan(),
    );
    println!(
        "\n{} 安全提醒: 请妥善保管你的 Token，不要分享给他人。",
        *symbols::INFO
    );
}
