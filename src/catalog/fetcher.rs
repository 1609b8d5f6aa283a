// src/catalog/fetcher.rs

use super::{CatalogEntry, CatalogTree};
use crate::{
    client::HttpClient,
    config::AppConfig,
    constants,
    error::*,
    models::api::{BookListVersionResponse, BookRecord, Hierarchy, TagHierarchyResponse},
};
use indexmap::IndexMap;
use log::{debug, info, warn};

/// 目录构建过程的诊断计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_books: usize,
    /// 标签路径无法挂载到层级树上、被静默跳过的课本数。
    pub skipped_books: usize,
}

/// 一次性拉取标签层级与课本分片列表，构建嵌套目录树。
pub struct CatalogFetcher<'a> {
    http_client: &'a HttpClient,
    config: &'a AppConfig,
}

impl<'a> CatalogFetcher<'a> {
    pub fn new(http_client: &'a HttpClient, config: &'a AppConfig) -> Self {
        Self { http_client, config }
    }

    pub async fn fetch_catalog(&self) -> AppResult<(CatalogTree, CatalogStats)> {
        info!("开始获取课本目录层级数据");
        let template = self
            .config
            .url_templates
            .get(constants::api::url_templates::TAG_HIERARCHY)
            .ok_or_else(|| anyhow::anyhow!("缺少 TAG_HIERARCHY URL 模板"))?;
        let tags: TagHierarchyResponse = self.http_client.fetch_json(template, &[]).await?;
        let mut tree = parse_hierarchy(tags.hierarchies.as_deref()).unwrap_or_default();
        debug!("层级解析完成，根分类数: {}", tree.len());

        let template = self
            .config
            .url_templates
            .get(constants::api::url_templates::BOOK_LIST_VERSION)
            .ok_or_else(|| anyhow::anyhow!("缺少 BOOK_LIST_VERSION URL 模板"))?;
        let manifest: BookListVersionResponse = self.http_client.fetch_json(template, &[]).await?;
        let shard_urls: Vec<&str> = manifest
            .urls
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        info!("课本列表共 {} 个分片", shard_urls.len());

        let mut stats = CatalogStats::default();
        for shard_url in shard_urls {
            let books: Vec<BookRecord> = self.http_client.fetch_json_url(shard_url).await?;
            debug!("分片 '{}' 含 {} 条记录", shard_url, books.len());
            attach_books(&mut tree, &books, &mut stats);
        }
        if stats.skipped_books > 0 {
            warn!(
                "{} / {} 本课本的标签路径无法匹配层级树，已跳过",
                stats.skipped_books, stats.total_books
            );
        }
        info!(
            "目录构建完成: 共 {} 本课本，跳过 {} 本",
            stats.total_books, stats.skipped_books
        );
        Ok((tree, stats))
    }
}

/// 深度优先展开层级数组，按 tag_id 重新建键。来源是树形数据，无环。
pub fn parse_hierarchy(hierarchies: Option<&[Hierarchy]>) -> Option<CatalogTree> {
    let hierarchies = hierarchies?;
    if hierarchies.is_empty() {
        return None;
    }
    let mut parsed = IndexMap::new();
    for hierarchy in hierarchies {
        for child in &hierarchy.children {
            parsed.insert(
                child.tag_id.clone(),
                CatalogEntry::Category {
                    name: child.tag_name.clone(),
                    children: parse_hierarchy(child.hierarchies.as_deref()).unwrap_or_default(),
                },
            );
        }
    }
    Some(parsed)
}

/// 将一个分片里的课本记录逐条挂到目录树上。
pub fn attach_books(tree: &mut CatalogTree, books: &[BookRecord], stats: &mut CatalogStats) {
    for book in books {
        stats.total_books += 1;
        if !attach_book(tree, book) {
            debug!("课本 '{}' ({}) 的标签路径无法挂载，跳过", book.title, book.id);
            stats.skipped_books += 1;
        }
    }
}

fn attach_book(tree: &mut CatalogTree, book: &BookRecord) -> bool {
    let Some(first_path) = book.tag_paths.first() else {
        return false;
    };
    // 路径形如 "$ROOT/顶级标签id/二级id/...": 首段丢弃，次段定位根分类
    let mut segments = first_path.split('/');
    segments.next();
    let Some(root_id) = segments.next() else {
        return false;
    };
    let walk: Vec<&str> = segments.collect();

    let Some(CatalogEntry::Category { children, .. }) = tree.get_mut(root_id) else {
        return false;
    };
    // 路径第一段必须出现在根分类的子级中，否则整本书跳过
    match walk.first() {
        Some(first) if children.contains_key(*first) => {}
        _ => return false,
    }

    // 沿路径尽量下钻：中途缺失的段不报错，停留在原节点继续看下一段
    let mut current: &mut IndexMap<String, CatalogEntry> = children;
    for seg in &walk {
        let is_category = matches!(current.get(*seg), Some(CatalogEntry::Category { .. }));
        if !is_category {
            continue;
        }
        current = match current.get_mut(*seg) {
            Some(CatalogEntry::Category { children, .. }) => children,
            // is_category 已确认该段是 Category，此分支不可达；用 unreachable!
            // 使其发散以通过借用检查（借用经 break 逃出循环会与后续插入冲突）
            _ => unreachable!("checked by is_category above"),
        };
    }

    current.insert(
        book.id.clone(),
        CatalogEntry::Book {
            id: book.id.clone(),
            title: book.title.clone(),
        },
    );
    true
}
