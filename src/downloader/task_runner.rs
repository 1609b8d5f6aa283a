// src/downloader/task_runner.rs

use super::job::FileDownloader;
use crate::{AppContext, constants, error::*, models::*, ui, utils};
use futures::future;
use indicatif::{HumanBytes, MultiProgress};
use log::info;

/// 执行一批下载任务。
///
/// 每个任务立即各自 spawn，一并发到底：不排队、不限流、不支持取消，
/// 任务只会跑到完成或失败为止。
pub async fn execute_tasks(context: &AppContext, tasks: &[FileInfo]) -> AppResult<()> {
    if tasks.is_empty() {
        return Ok(());
    }

    let total_known_size: u64 = tasks.iter().filter_map(|t| t.ti_size).sum();
    ui::plain("");
    if total_known_size > 0 {
        ui::info(&format!(
            "开始下载 {} 个文件 (已知总大小: {})...",
            tasks.len(),
            HumanBytes(total_known_size)
        ));
    } else {
        ui::info(&format!("开始下载 {} 个文件...", tasks.len()));
    }

    let multi = MultiProgress::new();
    let handles: Vec<_> = tasks
        .iter()
        .cloned()
        .map(|task| {
            let context = context.clone();
            let filename = task
                .filepath
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let prefix = utils::truncate_text(&filename, constants::FILENAME_TRUNCATE_LENGTH);
            let pbar = match task.ti_size {
                Some(size) => multi.add(ui::new_bytes_progress_bar(size, &prefix)),
                None => multi.add(ui::new_spinner_bar(&prefix)),
            };
            tokio::spawn(async move {
                let result = FileDownloader::new(context.clone()).process(task, pbar.clone()).await;
                pbar.finish_and_clear();
                record_result(&context, &filename, result);
            })
        })
        .collect();

    info!("已派发 {} 个并发下载任务", handles.len());
    future::join_all(handles).await;
    Ok(())
}

fn record_result(context: &AppContext, filename: &str, result: AppResult<DownloadResult>) {
    match result {
        Ok(result) => {
            match result.status {
                DownloadStatus::Success => context.manager.record_success(),
                DownloadStatus::Skipped => context.manager.record_skip(
                    &result.filename,
                    result.message.as_deref().unwrap_or("文件已存在"),
                ),
                _ => context.manager.record_failure(&result.filename, result.status),
            }

            let (symbol, color_fn, default_msg) = result.status.get_display_info();
            match result.status {
                DownloadStatus::Skipped => {}
                DownloadStatus::Success => {
                    println!("{} {}", symbol, result.filename);
                }
                _ => {
                    let detail = result
                        .message
                        .map(|m| format!(" (详情: {})", m))
                        .unwrap_or_default();
                    eprintln!(
                        "{} {} {}",
                        symbol,
                        result.filename,
                        color_fn(format!("失败: {}{}", default_msg, detail).into())
                    );
                }
            }
        }
        Err(e) => {
            log::error!("任务 '{}' 发生未捕获的错误: {}", filename, e);
            context
                .manager
                .record_failure(filename, DownloadStatus::from(&e));
        }
    }
}
