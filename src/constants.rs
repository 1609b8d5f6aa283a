// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const FILENAME_TRUNCATE_LENGTH: usize = 65;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const CASCADE_LEVELS: usize = 6;
pub const SENTINEL: &str = "---";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 由课本 contentId 合成的详情页链接模板。
pub const DETAIL_URL_TEMPLATE: &str = "https://basic.smartedu.cn/tchMaterial/detail?contentType=assets_document&contentId={content_id}&catalogType=tchMaterial&subCatalog=tchMaterial";

pub mod api {
    pub mod url_templates {
        pub const TEXTBOOK_DETAILS: &str = "TEXTBOOK_DETAILS";
        pub const TAG_HIERARCHY: &str = "TAG_HIERARCHY";
        pub const BOOK_LIST_VERSION: &str = "BOOK_LIST_VERSION";
    }
    pub mod resource_formats {
        pub const PDF: &str = "pdf";
    }
    pub const CONTENT_ID_PARAM: &str = "contentId";
}
