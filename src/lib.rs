// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    catalog::CatalogFetcher,
    cli::Cli,
    client::HttpClient,
    config::AppConfig,
    downloader::DownloadManager,
    error::{AppError, AppResult},
    extractor::TextbookResolver,
    models::FileInfo,
};
use anyhow::anyhow;
use colored::*;
use log::{debug, info};
use std::{fs, path::Path, sync::Arc};

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct AppContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<HttpClient>,
    pub args: Arc<Cli>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new()?);
    debug!("加载的应用配置: {:?}", config);
    let http_client = Arc::new(HttpClient::new(config.clone())?);

    let context = AppContext {
        manager: DownloadManager::new(),
        config,
        http_client,
        args: args.clone(),
    };

    let urls: Vec<String> = if args.interactive {
        gather_urls_interactive(&context).await?
    } else if let Some(batch_file) = &args.batch_file {
        read_batch_file(batch_file)?
    } else {
        args.url.clone()
    };

    if urls.is_empty() {
        println!("\n{} 没有任何链接，任务结束。", *symbols::INFO);
        return Ok(());
    }

    process_batch(&urls, &context).await
}

/// 交互模式：先一次性拉取目录树，再进入级联浏览。
/// 目录获取失败是致命错误，直接向上冒泡终止进程。
async fn gather_urls_interactive(context: &AppContext) -> AppResult<Vec<String>> {
    println!("\n{} 正在获取课本目录，请稍候...", *symbols::INFO);
    let fetcher = CatalogFetcher::new(&context.http_client, &context.config);
    let (tree, stats) = fetcher.fetch_catalog().await?;
    println!(
        "{} 目录就绪: {} 个顶级分类，共 {} 本课本。",
        *symbols::OK,
        tree.len(),
        stats.total_books - stats.skipped_books
    );
    if stats.skipped_books > 0 {
        println!(
            "{} 有 {} 本课本的分类路径无法识别，已忽略。",
            *symbols::WARN,
            stats.skipped_books
        );
    }
    let urls = catalog::browser::browse(&tree)?;
    if urls.len() > 1 {
        let display: Vec<String> = urls
            .iter()
            .map(|u| utils::truncate_text(u, constants::FILENAME_TRUNCATE_LENGTH))
            .collect();
        let indices = ui::get_user_choices_from_menu(&display, "已收集的课本链接", "all");
        return Ok(indices.into_iter().map(|i| urls[i].clone()).collect());
    }
    Ok(urls)
}

fn read_batch_file(batch_file: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(batch_file).map_err(|e| {
        log::error!("读取批量文件 '{}' 失败: {}", batch_file.display(), e);
        AppError::from(e)
    })?;

    let tasks: Vec<String> = content
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if tasks.is_empty() {
        log::warn!("批量文件 '{}' 为空或不含有效行。", batch_file.display());
        println!(
            "{} 批量文件 '{}' 为空。",
            *symbols::WARN,
            batch_file.display()
        );
    }
    Ok(tasks)
}

/// 处理一批链接：逐条解析为 PDF 任务，然后统一下载或打印。
/// 单条失败只累计，整批结束时汇总报告。
pub async fn process_batch(urls: &[String], context: &AppContext) -> AppResult<()> {
    context.manager.start_batch(urls.len());
    ui::print_header(&format!("开始处理 {} 个链接", urls.len()));

    let resolver = TextbookResolver::new(&context.http_client, &context.config);
    let mut tasks: Vec<FileInfo> = Vec::new();
    for url in urls {
        match resolver.resolve_url(url).await {
            Ok(task) => tasks.push(task),
            Err(e) => {
                log::error!("解析链接 '{}' 失败: {}", url, e);
                eprintln!(
                    "\n{} 无法解析链接: {}\n    {}",
                    *symbols::ERROR,
                    utils::truncate_text(url, 70),
                    e.to_string().red()
                );
                context.manager.record_failed_link(url, &e.to_string());
            }
        }
    }
    info!("解析完成: {} 成功, {} 失败", tasks.len(), urls.len() - tasks.len());

    if context.args.parse_only {
        if !tasks.is_empty() {
            ui::print_sub_header("解析出的 PDF 直链");
            for task in &tasks {
                println!("{}", task.url);
                context.manager.record_success();
            }
        }
    } else if !tasks.is_empty() {
        let base_output_dir = context.args.output.clone();
        fs::create_dir_all(&base_output_dir)?;
        let absolute_path = dunce::canonicalize(&base_output_dir)?;
        println!(
            "\n{} 文件将保存到目录: \"{}\"",
            *symbols::INFO,
            absolute_path.display()
        );

        for task in &mut tasks {
            task.filepath = base_output_dir.join(&task.filepath);
        }
        downloader::execute_tasks(context, &tasks).await?;
    }

    context.manager.print_report();
    let stats = context.manager.get_stats();
    if context.manager.did_all_succeed() {
        Ok(())
    } else {
        Err(AppError::Other(anyhow!("{} 个任务执行失败。", stats.failed)))
    }
}
