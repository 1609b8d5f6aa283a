// src/catalog/mod.rs

pub mod browser;
pub mod fetcher;
pub mod selector;

pub use fetcher::{CatalogFetcher, CatalogStats};
pub use selector::{CascadeSelector, Outcome};

use indexmap::IndexMap;

/// 目录树的根：顶级标签 id 到节点的映射。启动时构建一次，之后只读。
pub type CatalogTree = IndexMap<String, CatalogEntry>;

/// 目录树中的一个节点。
///
/// 分类与课本在类型层面区分开，级联选择不再需要靠探测
/// `name`/`title` 键是否存在来判断是否到达叶子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Category {
        name: String,
        children: IndexMap<String, CatalogEntry>,
    },
    Book {
        id: String,
        title: String,
    },
}

impl CatalogEntry {
    /// 下拉选项中展示的文本：分类显示 name，课本显示 title。
    pub fn display_text(&self) -> &str {
        match self {
            CatalogEntry::Category { name, .. } => name,
            CatalogEntry::Book { title, .. } => title,
        }
    }

    pub fn children(&self) -> Option<&IndexMap<String, CatalogEntry>> {
        match self {
            CatalogEntry::Category { children, .. } => Some(children),
            CatalogEntry::Book { .. } => None,
        }
    }
}

/// 在兄弟集合中按展示文本精确匹配。
///
/// 同级出现重名时，按插入顺序首个命中者获胜；这是上游数据的
/// 既有行为，有意保留。
pub(crate) fn find_child<'a>(
    siblings: &'a IndexMap<String, CatalogEntry>,
    text: &str,
) -> Option<&'a CatalogEntry> {
    siblings.values().find(|entry| entry.display_text() == text)
}
