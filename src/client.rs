// src/client.rs

use crate::{config::AppConfig, error::*};
use anyhow::anyhow;
use colored::Colorize;
use reqwest::{Client, IntoUrl, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 对 reqwest 的薄封装：负责 `{prefix}` 模板替换与多服务器回退。
///
/// 注意：没有任何重试策略。单次请求失败即失败，仅会在配置的
/// 多个服务器前缀之间逐一尝试。
#[derive(Clone)]
pub struct HttpClient {
    pub client: Client,
    config: Arc<AppConfig>,
}

impl HttpClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self.client.get(url).send().await?;
        Ok(res.error_for_status()?)
    }

    /// 获取一个绝对地址的 JSON 响应并反序列化。
    pub async fn fetch_json_url<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let text = self.get(url).await?.text().await?;
        serde_json::from_str(&text).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })
    }

    /// 按 URL 模板获取 JSON：依次将配置中的服务器前缀代入 `{prefix}`，
    /// 直到某个服务器成功为止。
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url_template: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let mut last_error = None;
        for prefix in &self.config.server_prefixes {
            let mut url = url_template.replace("{prefix}", prefix);
            for (key, val) in params {
                url = url.replace(&format!("{{{}}}", key), val);
            }
            match self.fetch_json_url(&url).await {
                Ok(value) => return Ok(value),
                Err(e @ AppError::ApiParseFailed { .. }) => {
                    // 响应形状不对不是服务器问题，换服务器也没用
                    return Err(e);
                }
                Err(e) => {
                    eprintln!(
                        "{} 服务器 '{}' 请求失败: {:?}",
                        "[!]".yellow(),
                        prefix,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(AppError::Other(anyhow!("所有服务器均请求失败"))))
    }
}
