// src/models/api.rs

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

// --- 标签层级 (tag hierarchy) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct TagHierarchyResponse {
    pub hierarchies: Option<Vec<Hierarchy>>,
}

/// 层级数组中的一项，children 列出该层的标签记录。
#[derive(Deserialize, Debug, Clone)]
pub struct Hierarchy {
    #[serde(default)]
    pub children: Vec<TagRecord>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TagRecord {
    pub tag_id: String,
    pub tag_name: String,
    pub hierarchies: Option<Vec<Hierarchy>>,
}

// --- 课本列表 (book list) API 响应结构体 ---

/// data_version.json 清单，`urls` 是逗号分隔的分片地址列表。
#[derive(Deserialize, Debug, Clone)]
pub struct BookListVersionResponse {
    pub urls: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tag_paths: Vec<String>,
}

// --- 教材详情 (textbook details) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct TextbookDetailsResponse {
    pub title: Option<String>,
    pub ti_items: Option<Vec<TiItem>>,
    pub update_time: Option<DateTime<FixedOffset>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TiItem {
    #[serde(alias = "ti_format")]
    pub lc_ti_format: String,
    pub ti_storages: Option<Vec<String>>,
    pub ti_md5: Option<String>,
    pub ti_size: Option<u64>,
}
