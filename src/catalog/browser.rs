// src/catalog/browser.rs

use super::{CascadeSelector, CatalogTree, Outcome};
use crate::{
    constants::{self, SENTINEL},
    error::*,
    symbols, ui,
};
use log::info;

/// 由课本 contentId 合成详情页链接。
pub fn detail_url(content_id: &str) -> String {
    constants::DETAIL_URL_TEMPLATE.replace("{content_id}", content_id)
}

/// 交互式目录浏览：六级分类逐级选择，定位课本并收集其详情页链接。
///
/// 返回用户选出的链接列表（保持选择顺序，可能为空）。
pub fn browse(tree: &CatalogTree) -> AppResult<Vec<String>> {
    let mut collected: Vec<String> = Vec::new();

    ui::print_header("课本目录浏览");
    println!(
        "逐级选择分类定位课本。在第一级选择 \"{}\" 结束浏览，其余级选择 \"{}\" 从头重选。",
        SENTINEL, SENTINEL
    );

    'browse: loop {
        let mut selector = CascadeSelector::new(tree);
        let mut options = selector.root_options();
        let mut level = 0usize;

        loop {
            let Some(choice) = prompt_level(&options, level)? else {
                // 用户输入空行，视作取消本次浏览
                break 'browse;
            };

            match selector.select(level, &choice) {
                Outcome::Reset => {
                    if level == 0 {
                        break 'browse;
                    }
                    println!("{} 已重置，从第一级重新选择。", *symbols::INFO);
                    continue 'browse;
                }
                Outcome::ReachedLeaf(id) => {
                    let url = detail_url(&id);
                    info!("级联选择定位到课本 '{}' ({})", choice, id);
                    println!("\n{} 已选中课本: {}", *symbols::OK, choice);
                    println!("    {}", url);
                    collected.push(url);
                    break;
                }
                Outcome::AwaitingNextLevel(next_options) => {
                    if next_options.len() == 1 {
                        println!("{} 分类 '{}' 下暂无更深的条目，从头重选。", *symbols::WARN, choice);
                        continue 'browse;
                    }
                    options = next_options;
                    level += 1;
                }
            }
        }

        if !ui::confirm("继续浏览选择其他课本吗?", true) {
            break;
        }
    }

    Ok(collected)
}

/// 展示某一级的选项菜单，返回选中的文本；空输入返回 None。
fn prompt_level(options: &[String], level: usize) -> AppResult<Option<String>> {
    loop {
        let input = ui::selection_menu(
            options,
            &format!("第 {} 级分类", level + 1),
            "请输入数字选择 (直接按回车取消)",
            "",
        );
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<usize>() {
            Ok(idx) if idx > 0 && idx <= options.len() => {
                return Ok(Some(options[idx - 1].clone()));
            }
            _ => {
                eprintln!("\n{} 无效的选择 '{}'。", *symbols::ERROR, input);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_url_synthesis() {
        let url = detail_url("b8e9a3fe-dae7-49c0-86cb-d146f883fd8e");
        assert_eq!(
            url,
            "https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document&contentId=b8e9a3fe-dae7-49c0-86cb-d146f883fd8e&catalogType=tchMaterial&subCatalog=tchMaterial"
        );
        // 合成的链接必须能被词法解析还原出同一个 id
        assert_eq!(
            crate::utils::extract_content_id(&url),
            Some("b8e9a3fe-dae7-49c0-86cb-d146f883fd8e".to_string())
        );
    }
}
