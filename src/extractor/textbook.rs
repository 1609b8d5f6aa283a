// src/extractor/textbook.rs

use crate::{
    client::HttpClient,
    config::AppConfig,
    constants,
    error::*,
    models::{FileInfo, api::TextbookDetailsResponse},
    utils,
};
use log::{debug, info};
use std::path::PathBuf;

/// 将课本详情页链接 / contentId 解析为可下载的 PDF 任务。
pub struct TextbookResolver<'a> {
    http_client: &'a HttpClient,
    config: &'a AppConfig,
}

impl<'a> TextbookResolver<'a> {
    pub fn new(http_client: &'a HttpClient, config: &'a AppConfig) -> Self {
        Self { http_client, config }
    }

    /// 从详情页链接解析。contentId 缺失或非法立即失败，不发起请求。
    pub async fn resolve_url(&self, url: &str) -> AppResult<FileInfo> {
        let content_id = utils::extract_content_id(url)
            .ok_or_else(|| AppError::MissingContentId(url.to_string()))?;
        self.resolve(&content_id).await
    }

    pub async fn resolve(&self, content_id: &str) -> AppResult<FileInfo> {
        info!("开始解析课本资源, ID: {}", content_id);
        let template = self
            .config
            .url_templates
            .get(constants::api::url_templates::TEXTBOOK_DETAILS)
            .ok_or_else(|| anyhow::anyhow!("缺少 TEXTBOOK_DETAILS URL 模板"))?;
        let data: TextbookDetailsResponse = self
            .http_client
            .fetch_json(template, &[("resource_id", content_id)])
            .await?;

        extract_pdf_info(&data, content_id)
    }
}

/// 从详情响应中取出 PDF 任务：格式为 "pdf" 的首个 ti_item 的第一个
/// 存储地址，并去掉其中的 "-private" 路径片段。
pub fn extract_pdf_info(data: &TextbookDetailsResponse, content_id: &str) -> AppResult<FileInfo> {
    let pdf_item = data
        .ti_items
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|item| item.lc_ti_format == constants::api::resource_formats::PDF)
        .ok_or_else(|| AppError::MissingPdf(content_id.to_string()))?;

    let storage = pdf_item
        .ti_storages
        .as_deref()
        .unwrap_or_default()
        .first()
        .ok_or_else(|| AppError::MissingPdf(content_id.to_string()))?;
    let pdf_url = storage.replace("-private", "");

    let title = data.title.as_deref().unwrap_or(content_id);
    let filename = format!("{}.pdf", utils::sanitize_filename(title));
    debug!("提取到PDF文件: '{}' @ '{}'", filename, pdf_url);

    Ok(FileInfo {
        filepath: PathBuf::from(filename),
        url: pdf_url,
        ti_md5: pdf_item.ti_md5.clone(),
        ti_size: pdf_item.ti_size,
        date: data.update_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(json: serde_json::Value) -> TextbookDetailsResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_extract_pdf_strips_private_segment() {
        let data = details(serde_json::json!({
            "title": "语文一年级上册",
            "ti_items": [
                { "lc_ti_format": "jpg", "ti_storages": ["https://r1.ykt.cbern.com.cn/cover.jpg"] },
                {
                    "lc_ti_format": "pdf",
                    "ti_storages": [
                        "https://r1-ndr-private.ykt.cbern.com.cn/edu_product/esp/assets/book.pkg/pdf.pdf",
                        "https://r2-ndr-private.ykt.cbern.com.cn/edu_product/esp/assets/book.pkg/pdf.pdf"
                    ],
                    "ti_size": 12345
                }
            ]
        }));
        let info = extract_pdf_info(&data, "fake-id").unwrap();
        assert_eq!(
            info.url,
            "https://r1-ndr.ykt.cbern.com.cn/edu_product/esp/assets/book.pkg/pdf.pdf"
        );
        assert_eq!(info.filepath.to_string_lossy(), "语文一年级上册.pdf");
        assert_eq!(info.ti_size, Some(12345));
    }

    #[test]
    fn test_extract_pdf_accepts_legacy_format_key() {
        // 旧接口字段名为 ti_format
        let data = details(serde_json::json!({
            "title": "数学",
            "ti_items": [
                { "ti_format": "pdf", "ti_storages": ["https://r1.ykt.cbern.com.cn/a.pdf"] }
            ]
        }));
        let info = extract_pdf_info(&data, "fake-id").unwrap();
        assert_eq!(info.url, "https://r1.ykt.cbern.com.cn/a.pdf");
    }

    #[test]
    fn test_missing_pdf_item_is_an_error() {
        let data = details(serde_json::json!({
            "title": "语文",
            "ti_items": [
                { "lc_ti_format": "jpg", "ti_storages": ["https://r1.ykt.cbern.com.cn/cover.jpg"] }
            ]
        }));
        assert!(matches!(
            extract_pdf_info(&data, "fake-id"),
            Err(AppError::MissingPdf(_))
        ));

        let empty = details(serde_json::json!({ "title": "语文" }));
        assert!(matches!(
            extract_pdf_info(&empty, "fake-id"),
            Err(AppError::MissingPdf(_))
        ));
    }

    #[test]
    fn test_filename_falls_back_to_content_id() {
        let data = details(serde_json::json!({
            "ti_items": [
                { "lc_ti_format": "pdf", "ti_storages": ["https://r1.ykt.cbern.com.cn/a.pdf"] }
            ]
        }));
        let info = extract_pdf_info(&data, "fake-id").unwrap();
        assert_eq!(info.filepath.to_string_lossy(), "fake-id.pdf");
    }
}
