// src/downloader/mod.rs

mod job;
mod task_runner;

pub use job::FileDownloader;
pub use task_runner::execute_tasks;

use crate::{symbols, ui};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 一批任务的共享统计与汇总报告。
///
/// 单个链接的解析或下载失败只记录，不中断整批；批次结束时统一
/// 汇报失败明细。
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_items: Arc<Mutex<Vec<(String, String)>>>,
    skipped_items: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_items: Arc::new(Mutex::new(Vec::new())),
            skipped_items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn start_batch(&self, total_tasks: usize) {
        info!("开始新一批下载任务，总数: {}", total_tasks);
        let mut stats = self.stats.lock().unwrap();
        *stats = DownloadStats {
            total: total_tasks,
            ..Default::default()
        };
        self.failed_items.lock().unwrap().clear();
        self.skipped_items.lock().unwrap().clear();
    }

    pub fn record_success(&self) {
        self.stats.lock().unwrap().success += 1;
    }

    pub fn record_skip(&self, filename: &str, reason: &str) {
        info!("跳过文件 '{}'，原因: {}", filename, reason);
        self.stats.lock().unwrap().skipped += 1;
        self.skipped_items
            .lock()
            .unwrap()
            .push((filename.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, name: &str, status: crate::models::DownloadStatus) {
        log::error!("文件 '{}' 下载失败，状态: {:?}", name, status);
        let (_, _, msg) = status.get_display_info();
        self.record_failed_link(name, msg);
    }

    /// 记录一个解析失败的链接（下载前就失败的条目也计入失败总数）。
    pub fn record_failed_link(&self, link: &str, reason: &str) {
        self.stats.lock().unwrap().failed += 1;
        self.failed_items
            .lock()
            .unwrap()
            .push((link.to_string(), reason.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn failed_links(&self) -> Vec<(String, String)> {
        self.failed_items.lock().unwrap().clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        self.stats.lock().unwrap().failed == 0
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let skipped = self.skipped_items.lock().unwrap();
        let failed = self.failed_items.lock().unwrap();
        info!(
            "下载报告: Total={}, Success={}, Skipped={}, Failed={}",
            stats.total, stats.success, stats.skipped, stats.failed
        );

        if !skipped.is_empty() || !failed.is_empty() {
            ui::print_sub_header("下载详情报告");
            if !skipped.is_empty() {
                println!("\n{} 跳过的文件 ({}个):", *symbols::INFO, stats.skipped);
                print_grouped_report(&skipped, |s| s.cyan());
            }
            if !failed.is_empty() {
                println!("\n{} 失败的条目 ({}个):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        ui::print_sub_header("任务总结");
        if stats.total > 0 && stats.success == stats.total - stats.skipped {
            println!(
                "{} 所有 {} 个任务均已成功 ({} 个已跳过)。",
                *symbols::OK,
                stats.total,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("成功: {}", stats.success).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

// 模块内的私有辅助函数
fn print_grouped_report(
    items: &[(String, String)],
    color_fn: fn(ColoredString) -> ColoredString,
) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (name, reason) in items {
        grouped.entry(reason).or_default().push(name);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("原因: {}", reason).into()));
        let mut names = grouped.get(reason).unwrap().clone();
        names.sort();
        for name in names {
            println!("    - {}", name);
        }
    }
}
