//! 基于目录的 JSON 文档存储
//!
//! 目录结构：
//!
//! ```text
//! {root}/{templateKey}/{statisticId}-progress.json
//! {root}/{templateKey}/papers/{paperId}.json
//! {root}/{templateKey}/published.json
//! ```
//!
//! 写入先落到同目录的临时文件再重命名，进程中断不会留下半个文档。
//!
//! 论文 ID 是不透明字符串，文件名对其做百分号编码（只保留字母、数字、`-`、`_`）；
//! 文档本身保存原始的 `paperId`，读取时不需要解码文件名。

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;
use tracing::{debug, warn};

use super::{CachedProgress, ProgressStore};
use crate::error::StoreError;
use crate::models::{PaperAnalysisResult, PublishedStatistics, QueryTemplate, StatisticsProgress};

const PAPERS_DIR: &str = "papers";
const PUBLISHED_FILE: &str = "published.json";

/// 文件名中需要编码的字符
const PAPER_FILE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// JSON 文件进度存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, template_key: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(checked_key(template_key)?))
    }

    fn papers_dir(&self, template: &QueryTemplate) -> Result<PathBuf, StoreError> {
        Ok(self.namespace_dir(&template.key)?.join(PAPERS_DIR))
    }

    fn paper_path(&self, template: &QueryTemplate, paper_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .papers_dir(template)?
            .join(format!("{}.json", paper_file_stem(paper_id)?)))
    }

    fn progress_path(&self, template: &QueryTemplate) -> Result<PathBuf, StoreError> {
        let key = template.progress_key();
        Ok(self
            .namespace_dir(&template.key)?
            .join(format!("{}.json", checked_key(&key)?)))
    }

    fn published_path(&self, template_key: &str) -> Result<PathBuf, StoreError> {
        Ok(self.namespace_dir(template_key)?.join(PUBLISHED_FILE))
    }
}

#[async_trait]
impl ProgressStore for JsonFileStore {
    async fn load_progress(&self, template: &QueryTemplate) -> Result<CachedProgress, StoreError> {
        let dir = self.papers_dir(template)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CachedProgress::default()),
            Err(source) => return Err(read_failed(&dir, source)),
        };

        let mut results = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| read_failed(&dir, source))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match read_json::<PaperAnalysisResult>(&path).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => warn!("跳过无法读取的结果文档 {}: {}", path.display(), e),
            }
        }

        debug!("从 {} 读取了 {} 个缓存结果", dir.display(), results.len());
        Ok(CachedProgress::from_results(results))
    }

    async fn save_result(
        &self,
        template: &QueryTemplate,
        result: &PaperAnalysisResult,
    ) -> Result<(), StoreError> {
        let path = self.paper_path(template, &result.paper_id)?;
        write_json(&path, result).await
    }

    async fn delete_result(&self, template: &QueryTemplate, paper_id: &str) -> Result<(), StoreError> {
        let path = self.paper_path(template, paper_id)?;
        remove_file_if_exists(&path).await
    }

    async fn load_progress_summary(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<StatisticsProgress>, StoreError> {
        read_json(&self.progress_path(template)?).await
    }

    async fn write_progress_summary(
        &self,
        template: &QueryTemplate,
        progress: &StatisticsProgress,
    ) -> Result<(), StoreError> {
        write_json(&self.progress_path(template)?, progress).await
    }

    async fn purge(&self, template: &QueryTemplate) -> Result<(), StoreError> {
        let dir = self.papers_dir(template)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::DeleteFailed {
                    path: dir.display().to_string(),
                    source,
                })
            }
        }
        remove_file_if_exists(&self.progress_path(template)?).await
    }

    async fn publish_statistics(&self, published: &PublishedStatistics) -> Result<(), StoreError> {
        write_json(&self.published_path(&published.template_key)?, published).await
    }

    async fn load_published(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<PublishedStatistics>, StoreError> {
        read_json(&self.published_path(&template.key)?).await
    }
}

// ========== 辅助函数 ==========

/// 键名只能由字母、数字、`-`、`_`、`.` 组成且以字母或数字开头
fn checked_key(key: &str) -> Result<&str, StoreError> {
    static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = KEY_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("static key pattern is valid")
    });

    if pattern.is_match(key) {
        Ok(key)
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// 论文 ID 对应的文件名（不含扩展名），不同 ID 映射到不同文件名
fn paper_file_stem(paper_id: &str) -> Result<String, StoreError> {
    if paper_id.is_empty() {
        return Err(StoreError::InvalidKey(paper_id.to_string()));
    }
    Ok(utf8_percent_encode(paper_id, PAPER_FILE_ENCODE_SET).to_string())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(read_failed(path, source)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::serialization(path.display().to_string(), source))
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| StoreError::serialization(path.display().to_string(), source))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| write_failed(parent, source))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &bytes)
        .await
        .map_err(|source| write_failed(&tmp_path, source))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|source| write_failed(path, source))
}

async fn remove_file_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::DeleteFailed {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn read_failed(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::ReadFailed {
        path: path.display().to_string(),
        source,
    }
}

fn write_failed(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_key() {
        assert!(checked_key("R12345").is_ok());
        assert!(checked_key("empire-statistics-progress").is_ok());
        assert!(checked_key("..").is_err());
        assert!(checked_key("a/b").is_err());
        assert!(checked_key("").is_err());
    }

    #[test]
    fn test_paper_file_stem() {
        assert_eq!(paper_file_stem("R12345").unwrap(), "R12345");
        assert_eq!(paper_file_stem("urn:uuid:42").unwrap(), "urn%3Auuid%3A42");
        assert_eq!(paper_file_stem("paper#p1").unwrap(), "paper%23p1");
        assert_eq!(paper_file_stem("../x").unwrap(), "%2E%2E%2Fx");
        // `%` 本身也被编码，编码结果不会与另一个 ID 冲突
        assert_ne!(
            paper_file_stem("a%3Ab").unwrap(),
            paper_file_stem("a:b").unwrap()
        );
        assert!(paper_file_stem("").is_err());
    }
}
