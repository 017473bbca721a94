// src/client.rs

use crate::{config::AppConfig, error::*, models::api::ErrorBody};
use log::{debug, warn};
use reqwest::{Response, StatusCode, header};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<AppConfig>,
    token: Option<String>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>, token: Option<String>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            config,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 带认证头的 GET。401 视为会话失效，其余非 2xx 状态转换为 `AppError::Server`。
    pub async fn get(&self, url: Url) -> AppResult<Response> {
        let token = self.token.as_deref().ok_or(AppError::Unlinked)?;
        debug!("GET {}", url);
        let res = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        Self::check_status(res).await
    }

    async fn check_status(res: Response) -> AppResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("服务器返回 401，会话未认证或已解除关联");
            return Err(AppError::Unlinked);
        }
        let url = res.url().to_string();
        // 错误体可能不是 JSON，解析失败时按空错误体处理
        let body = res
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .unwrap_or_default();
        warn!("请求 '{}' 失败: {} {:?}", url, status, body);
        Err(AppError::Server { status, body })
    }
}
