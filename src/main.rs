// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc, time::Duration};
use tm_dl::{cli::Cli, logging, run_from_cli};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!("\n{} 用户强制中断程序。", "[!]".yellow());
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::process::exit(130);
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "tm-dl".to_string());

    let after_help = format!(
        "示例:\n  # 浏览课本目录并下载 (推荐)\n  {bin} -i\n\n  # 下载单个详情页链接中的课本\n  {bin} --url \"https://basic.smartedu.cn/tchMaterial/detail?contentId=...\"\n\n  # 批量下载\n  {bin} -b my_links.txt\n\n  # 只解析直链不下载\n  {bin} --url \"https://...\" -p",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);

    let args = Arc::new(Cli::from_arg_matches(&cmd.get_matches()).unwrap());

    logging::setup_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
