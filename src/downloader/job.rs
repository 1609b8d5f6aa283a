// src/downloader/job.rs

use crate::{AppContext, cli::Cli, error::*, models::*, utils};
use futures::StreamExt;
use indicatif::{HumanBytes, ProgressBar};
use log::{debug, error, info};
use std::{
    fs::{self, File},
    io::Write as IoWrite,
};

#[derive(Debug, PartialEq, Eq)]
enum ValidationStatus {
    Valid,
    Invalid(String),
    NoInfoToValidate,
}

/// 处理单个文件任务：判定跳过/下载、流式写盘、事后校验。
pub struct FileDownloader {
    context: AppContext,
}

impl FileDownloader {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    pub async fn process(&self, item: FileInfo, pbar: ProgressBar) -> AppResult<DownloadResult> {
        let filename = item
            .filepath
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| item.url.clone());

        let attempt_result: AppResult<DownloadResult> = async {
            if let Some(parent) = item.filepath.parent() {
                fs::create_dir_all(parent)?;
            }
            let (action, reason) = Self::prepare_download_action(&item, &self.context.args)?;
            if action == DownloadAction::Skip {
                return Ok(DownloadResult {
                    filename: filename.clone(),
                    status: DownloadStatus::Skipped,
                    message: Some(reason),
                });
            }

            self.download_to_file(&item, &pbar).await?;

            let final_status = Self::finalize_and_validate(&item)?;
            Ok(DownloadResult {
                filename: filename.clone(),
                status: final_status,
                message: None,
            })
        }
        .await;

        match attempt_result {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("处理任务 '{:?}' 时发生错误: {}", item.filepath, e);
                Ok(DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                })
            }
        }
    }

    /// 检查本地文件状态，决定是跳过还是重新下载。
    fn prepare_download_action(item: &FileInfo, args: &Cli) -> AppResult<(DownloadAction, String)> {
        if !item.filepath.exists() {
            return Ok((DownloadAction::DownloadNew, "文件不存在".to_string()));
        }
        if args.force_redownload {
            info!("用户强制重新下载文件: {:?}", item.filepath);
            return Ok((DownloadAction::DownloadNew, "强制重新下载".to_string()));
        }
        match Self::check_local_file_status(item)? {
            ValidationStatus::Valid => Ok((
                DownloadAction::Skip,
                "文件已存在且校验通过".to_string(),
            )),
            ValidationStatus::Invalid(reason) => Ok((
                DownloadAction::DownloadNew,
                format!("文件无效: {}", reason),
            )),
            ValidationStatus::NoInfoToValidate => Ok((
                DownloadAction::Skip,
                "文件已存在 (无校验信息)".to_string(),
            )),
        }
    }

    /// 下载完成后对文件进行最终的校验。
    fn finalize_and_validate(item: &FileInfo) -> AppResult<DownloadStatus> {
        debug!("对文件 '{:?}' 进行最终校验", item.filepath);
        match Self::check_local_file_status(item)? {
            ValidationStatus::Valid | ValidationStatus::NoInfoToValidate => {
                Ok(DownloadStatus::Success)
            }
            ValidationStatus::Invalid(reason) => {
                error!("文件 '{:?}' 最终校验失败: {}", item.filepath, reason);
                Ok(if reason.contains("MD5") {
                    DownloadStatus::Md5Failed
                } else {
                    DownloadStatus::SizeFailed
                })
            }
        }
    }

    /// 检查本地文件的有效性（大小、MD5）。
    fn check_local_file_status(item: &FileInfo) -> AppResult<ValidationStatus> {
        if !item.filepath.exists() {
            return Ok(ValidationStatus::Invalid("文件不存在".to_string()));
        }
        let actual_size = item.filepath.metadata()?.len();
        if actual_size == 0 {
            return Ok(ValidationStatus::Invalid("文件为空(0字节)".to_string()));
        }

        if let Some(expected_size) = item.ti_size {
            if actual_size != expected_size {
                return Ok(ValidationStatus::Invalid(format!(
                    "大小错误 (预期: {}, 实际: {})",
                    HumanBytes(expected_size),
                    HumanBytes(actual_size)
                )));
            }
            return Ok(ValidationStatus::Valid);
        }

        if let Some(expected_md5) = &item.ti_md5 {
            debug!(
                "文件 '{:?}' 没有大小信息，开始进行 MD5 校验...",
                item.filepath.file_name()
            );
            let actual_md5 = utils::calculate_file_md5(&item.filepath)?;
            if !actual_md5.eq_ignore_ascii_case(expected_md5) {
                return Ok(ValidationStatus::Invalid("MD5不匹配".to_string()));
            }
            return Ok(ValidationStatus::Valid);
        }

        Ok(ValidationStatus::NoInfoToValidate)
    }

    /// 分块流式写入目标文件，进度回调走 indicatif。
    async fn download_to_file(&self, item: &FileInfo, pbar: &ProgressBar) -> AppResult<()> {
        let res = self.context.http_client.get(&item.url).await?;
        if let Some(len) = res.content_length() {
            pbar.set_length(len);
        }

        let mut file = File::create(&item.filepath)?;
        let mut stream = res.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk)?;
            pbar.inc(chunk.len() as u64);
        }
        Ok(())
    }
}
