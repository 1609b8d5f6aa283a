// tests/textbook_resolver_test.rs

use std::sync::Arc;
use tm_dl::{
    client::HttpClient, config::AppConfig, error::AppError, error::AppResult,
    extractor::TextbookResolver,
};

fn test_config(server_url: &str) -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.url_templates.insert(
        "TEXTBOOK_DETAILS".to_string(),
        format!(
            "{}/zxx/ndrv2/resources/tch_material/details/{{resource_id}}.json",
            server_url
        ),
    );
    Arc::new(config)
}

const CONTENT_ID: &str = "b8e9a3fe-dae7-49c0-86cb-d146f883fd8e";

#[tokio::test]
async fn test_resolve_url_extracts_pdf_and_title() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let details_mock = server
        .mock(
            "GET",
            format!("/zxx/ndrv2/resources/tch_material/details/{}.json", CONTENT_ID).as_str(),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "title": "义务教育教科书·语文一年级上册",
                "ti_items": [
                    {
                        "lc_ti_format": "pdf",
                        "ti_storages": [
                            "https://r1-ndr-private.ykt.cbern.com.cn/edu_product/esp/assets/b8e9a3fe.pkg/pdf.pdf"
                        ],
                        "ti_size": 1024
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = test_config(&server_url);
    let http_client = HttpClient::new(config.clone())?;
    let resolver = TextbookResolver::new(&http_client, &config);

    // 详情页链接里夹杂其他参数也能解析出同一个 contentId
    let url = format!(
        "https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document&contentId={}&catalogType=tchMaterial",
        CONTENT_ID
    );
    let info = resolver.resolve_url(&url).await?;

    details_mock.assert_async().await;
    assert_eq!(
        info.url,
        "https://r1-ndr.ykt.cbern.com.cn/edu_product/esp/assets/b8e9a3fe.pkg/pdf.pdf"
    );
    assert_eq!(
        info.filepath.to_string_lossy(),
        "义务教育教科书·语文一年级上册.pdf"
    );
    assert_eq!(info.ti_size, Some(1024));

    Ok(())
}

#[tokio::test]
async fn test_resolve_url_without_content_id_fails_before_any_request() -> AppResult<()> {
    let config = Arc::new(AppConfig::default());
    let http_client = HttpClient::new(config.clone())?;
    let resolver = TextbookResolver::new(&http_client, &config);

    let result = resolver
        .resolve_url("https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document")
        .await;
    assert!(matches!(result, Err(AppError::MissingContentId(_))));
    Ok(())
}

#[tokio::test]
async fn test_resolve_reports_missing_pdf_item() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    server
        .mock(
            "GET",
            format!("/zxx/ndrv2/resources/tch_material/details/{}.json", CONTENT_ID).as_str(),
        )
        .with_status(200)
        .with_body(
            serde_json::json!({
                "title": "只有封面的课本",
                "ti_items": [
                    { "lc_ti_format": "jpg", "ti_storages": ["https://r1.ykt.cbern.com.cn/cover.jpg"] }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = test_config(&server_url);
    let http_client = HttpClient::new(config.clone())?;
    let resolver = TextbookResolver::new(&http_client, &config);

    let result = resolver.resolve(CONTENT_ID).await;
    assert!(matches!(result, Err(AppError::MissingPdf(_))));
    Ok(())
}

#[tokio::test]
async fn test_resolve_propagates_http_failure_without_retry() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    // expect(1): 失败请求不应被重试
    let details_mock = server
        .mock(
            "GET",
            format!("/zxx/ndrv2/resources/tch_material/details/{}.json", CONTENT_ID).as_str(),
        )
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let config = test_config(&server_url);
    let http_client = HttpClient::new(config.clone())?;
    let resolver = TextbookResolver::new(&http_client, &config);

    let result = resolver.resolve(CONTENT_ID).await;
    assert!(matches!(result, Err(AppError::Network(_))));

    details_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_resolve_rejects_non_json_response() -> AppResult<()> {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    server
        .mock(
            "GET",
            format!("/zxx/ndrv2/resources/tch_material/details/{}.json", CONTENT_ID).as_str(),
        )
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let config = test_config(&server_url);
    let http_client = HttpClient::new(config.clone())?;
    let resolver = TextbookResolver::new(&http_client, &config);

    let result = resolver.resolve(CONTENT_ID).await;
    assert!(matches!(result, Err(AppError::ApiParseFailed { .. })));
    Ok(())
}
