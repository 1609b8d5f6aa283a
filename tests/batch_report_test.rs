// tests/batch_report_test.rs

use clap::Parser;
use std::sync::Arc;
use tm_dl::{
    AppContext, cli::Cli, client::HttpClient, config::AppConfig, downloader::DownloadManager,
    error::AppResult, process_batch,
};

const ID_A: &str = "aaaaaaaa-0000-0000-0000-000000000001";
const ID_B: &str = "aaaaaaaa-0000-0000-0000-000000000002";

fn details_body(title: &str, pdf_url: &str, size: u64) -> String {
    serde_json::json!({
        "title": title,
        "ti_items": [
            { "lc_ti_format": "pdf", "ti_storages": [pdf_url], "ti_size": size }
        ]
    })
    .to_string()
}

/// 批量 3 个链接 (2 个有效 + 1 个无 contentId)：2 个成功下载，
/// 失败明细中恰有 1 条。
#[tokio::test(flavor = "multi_thread")]
async fn test_batch_aggregates_failures_without_aborting() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let pdf_body = b"%PDF-1.4 fake body".to_vec();

    for (id, title, pdf_path) in [
        (ID_A, "语文一年级上册", "/files/a.pdf"),
        (ID_B, "数学一年级上册", "/files/b.pdf"),
    ] {
        server
            .mock(
                "GET",
                format!("/zxx/ndrv2/resources/tch_material/details/{}.json", id).as_str(),
            )
            .with_status(200)
            .with_body(details_body(
                title,
                &format!("{}{}", server_url, pdf_path),
                pdf_body.len() as u64,
            ))
            .create_async()
            .await;
        server
            .mock("GET", pdf_path)
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(pdf_body.clone())
            .create_async()
            .await;
    }

    let mut config = AppConfig::default();
    config.url_templates.insert(
        "TEXTBOOK_DETAILS".to_string(),
        format!(
            "{}/zxx/ndrv2/resources/tch_material/details/{{resource_id}}.json",
            server_url
        ),
    );
    let config = Arc::new(config);

    let output_dir = tempfile::tempdir()?;
    let args = Arc::new(Cli::parse_from([
        "tm-dl",
        "--url",
        "placeholder",
        "-o",
        output_dir.path().to_str().unwrap(),
    ]));

    let context = AppContext {
        manager: DownloadManager::new(),
        config: config.clone(),
        http_client: Arc::new(HttpClient::new(config.clone())?),
        args,
    };

    let urls = vec![
        format!("https://basic.smartedu.cn/tchMaterial/detail?contentId={}&catalogType=tchMaterial", ID_A),
        "https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document".to_string(),
        format!("https://basic.smartedu.cn/tchMaterial/detail?catalogType=tchMaterial&contentId={}", ID_B),
    ];

    let result = process_batch(&urls, &context).await;
    assert!(result.is_err(), "存在失败条目时整批结果应为失败");

    let stats = context.manager.get_stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 1);

    let failed = context.manager.failed_links();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].0.contains("contentType=assets_document"));

    // 两个 PDF 都按标题落盘
    let a = output_dir.path().join("语文一年级上册.pdf");
    let b = output_dir.path().join("数学一年级上册.pdf");
    assert_eq!(std::fs::read(&a)?, pdf_body);
    assert_eq!(std::fs::read(&b)?, pdf_body);

    Ok(())
}

/// --parse-only: 打印直链，不产生任何文件。
#[tokio::test]
async fn test_parse_only_does_not_download() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    server
        .mock(
            "GET",
            format!("/zxx/ndrv2/resources/tch_material/details/{}.json", ID_A).as_str(),
        )
        .with_status(200)
        .with_body(details_body(
            "语文一年级上册",
            "https://r1-ndr-private.ykt.cbern.com.cn/files/a.pdf",
            64,
        ))
        .create_async()
        .await;

    let mut config = AppConfig::default();
    config.url_templates.insert(
        "TEXTBOOK_DETAILS".to_string(),
        format!(
            "{}/zxx/ndrv2/resources/tch_material/details/{{resource_id}}.json",
            server_url
        ),
    );
    let config = Arc::new(config);

    let output_dir = tempfile::tempdir()?;
    let args = Arc::new(Cli::parse_from([
        "tm-dl",
        "--url",
        "placeholder",
        "--parse-only",
        "-o",
        output_dir.path().to_str().unwrap(),
    ]));

    let context = AppContext {
        manager: DownloadManager::new(),
        config: config.clone(),
        http_client: Arc::new(HttpClient::new(config.clone())?),
        args,
    };

    let urls = vec![format!(
        "https://basic.smartedu.cn/tchMaterial/detail?contentId={}",
        ID_A
    )];
    process_batch(&urls, &context).await?;

    let stats = context.manager.get_stats();
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 0);
    // 输出目录保持为空
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 0);

    Ok(())
}
