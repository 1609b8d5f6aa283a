// src/catalog/selector.rs

use super::{CatalogEntry, CatalogTree, find_child};
use crate::constants::{CASCADE_LEVELS, SENTINEL};
use indexmap::IndexMap;
use log::debug;

/// 一次层级选择产生的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 选择了占位符，该层之后全部重置。
    Reset,
    /// 选中了一个分类，携带下一层的选项列表（首项恒为占位符）。
    AwaitingNextLevel(Vec<String>),
    /// 选中了一本课本，携带其 id。
    ReachedLeaf(String),
}

/// 六级依次联动的级联选择状态机。
///
/// 不变式：第 k 层为占位符时，k 之后的所有层也必为占位符。
/// 每次选择都从根重放已确认的各层文本，目录树本身保持只读。
pub struct CascadeSelector<'a> {
    tree: &'a CatalogTree,
    selections: Vec<String>,
}

impl<'a> CascadeSelector<'a> {
    pub fn new(tree: &'a CatalogTree) -> Self {
        Self {
            tree,
            selections: vec![SENTINEL.to_string(); CASCADE_LEVELS],
        }
    }

    /// 第 0 层的选项列表。
    pub fn root_options(&self) -> Vec<String> {
        let mut options = vec![SENTINEL.to_string()];
        options.extend(self.tree.values().map(|e| e.display_text().to_string()));
        options
    }

    pub fn selections(&self) -> &[String] {
        &self.selections
    }

    /// 将第 `level` 层的选择更新为 `value` 并推进状态机。
    pub fn select(&mut self, level: usize, value: &str) -> Outcome {
        assert!(level < CASCADE_LEVELS, "级联层级越界: {}", level);
        self.selections[level] = value.to_string();
        debug!("第 {} 层选择 '{}'", level, value);

        if value == SENTINEL {
            self.reset_after(level);
            return Outcome::Reset;
        }

        // 从根重放 0..=level 的已确认选择。只有最后一层例外：它
        // 一定是叶子，不参与分类名匹配。
        let category_depth = if level == CASCADE_LEVELS - 1 { level } else { level + 1 };
        let mut current: &IndexMap<String, CatalogEntry> = self.tree;
        let mut terminal = level == CASCADE_LEVELS - 1;
        for k in 0..category_depth {
            match find_child(current, &self.selections[k]) {
                Some(CatalogEntry::Category { children, .. }) => current = children,
                // 名字匹配不到分类：说明走到了课本一层
                _ => {
                    terminal = true;
                    break;
                }
            }
        }

        if terminal {
            // 按标题在当前层查课本
            match find_child(current, value) {
                Some(CatalogEntry::Book { id, .. }) => {
                    let id = id.clone();
                    self.reset_after(level);
                    debug!("级联到达叶子, 课本 id: {}", id);
                    Outcome::ReachedLeaf(id)
                }
                _ => {
                    self.reset_after(level);
                    Outcome::Reset
                }
            }
        } else {
            let mut options = vec![SENTINEL.to_string()];
            options.extend(current.values().map(|e| e.display_text().to_string()));
            self.reset_after(level);
            Outcome::AwaitingNextLevel(options)
        }
    }

    fn reset_after(&mut self, level: usize) {
        for slot in self.selections.iter_mut().skip(level + 1) {
            *slot = SENTINEL.to_string();
        }
    }
}
