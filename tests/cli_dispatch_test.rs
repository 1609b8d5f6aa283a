// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

// 辅助函数，避免重复
fn main_command() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let mut cmd = main_command();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"));
}

#[test]
fn test_no_args_shows_help() {
    let mut cmd = main_command();
    cmd.assert().failure();
}

#[test]
fn test_modes_are_mutually_exclusive() {
    let mut cmd = main_command();
    cmd.arg("-i").arg("--url").arg("https://example.com/x");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// --- 测试核心分发逻辑 ---

#[test]
fn test_url_without_content_id_fails_with_aggregate_report() {
    let mut cmd = main_command();
    // 没有 contentId 的链接在发起任何网络请求前就会被判为失败
    cmd.arg("--url")
        .arg("https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document")
        .arg("--parse-only");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("未找到有效的 contentId"));
}

#[test]
fn test_batch_file_collects_all_malformed_links() {
    let mut batch = NamedTempFile::new().unwrap();
    writeln!(batch, "https://basic.smartedu.cn/tchMaterial/detail?a=1").unwrap();
    writeln!(batch).unwrap();
    writeln!(batch, "https://basic.smartedu.cn/tchMaterial/detail?b=2").unwrap();

    let mut cmd = main_command();
    cmd.arg("-b")
        .arg(batch.path())
        .arg("--parse-only");
    // 两条坏链接都进入汇总报告，批次不会中途终止
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("失败的条目 (2个)"))
        .stderr(predicate::str::contains("2 个任务执行失败"));
}

#[test]
fn test_empty_batch_file_is_not_an_error() {
    let batch = NamedTempFile::new().unwrap();

    let mut cmd = main_command();
    cmd.arg("-b").arg(batch.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("没有任何链接"));
}
