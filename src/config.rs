// src/config.rs

use crate::{constants, error::AppResult};
use anyhow::{Context, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub server_prefixes: Option<Vec<String>>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// 持久化在 `~/.tm-dl/config.json` 的外部配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    pub url_templates: HashMap<String, String>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let url_templates = HashMap::from([
            (
                constants::api::url_templates::TEXTBOOK_DETAILS.into(),
                "https://{prefix}.ykt.cbern.com.cn/zxx/ndrv2/resources/tch_material/details/{resource_id}.json".into(),
            ),
            (
                constants::api::url_templates::TAG_HIERARCHY.into(),
                "https://{prefix}.ykt.cbern.com.cn/zxx/ndrs/tags/tch_material_tag.json".into(),
            ),
            (
                constants::api::url_templates::BOOK_LIST_VERSION.into(),
                "https://{prefix}.ykt.cbern.com.cn/zxx/ndrs/resources/tch_material/version/data_version.json".into(),
            ),
        ]);

        let network_config = NetworkConfig {
            server_prefixes: Some(vec!["s-file-1".into(), "s-file-2".into(), "s-file-3".into()]),
            connect_timeout_secs: Some(10),
            timeout_secs: Some(60),
        };

        Self {
            network: network_config,
            url_templates,
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| crate::error::AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(crate::error::AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_prefixes: Vec<String>,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub url_templates: HashMap<String, String>,
}

impl AppConfig {
    pub fn new() -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;

        Ok(Self {
            server_prefixes: external_config
                .network
                .server_prefixes
                .unwrap_or_default(),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(60)),
            url_templates: external_config.url_templates,
        })
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_prefixes: vec!["s-file-1".to_string()],
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            url_templates: HashMap::new(),
        }
    }
}
