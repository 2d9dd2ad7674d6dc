use crate::error::ConfigError;
use crate::models::template::{QueryTemplate, TemplateRegistry};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 模板文件结构
///
/// ```toml
/// [[templates]]
/// key = "my-template"
/// statistic_id = "my-template-statistics"
/// description = "..."
/// query = "SELECT ?paper WHERE { ... }"
/// ```
#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<QueryTemplate>,
}

/// 从 TOML 文件加载查询模板
pub async fn load_templates(toml_file_path: &Path) -> Result<Vec<QueryTemplate>, ConfigError> {
    let content = fs::read_to_string(toml_file_path).await.map_err(|source| {
        ConfigError::TemplateFileUnreadable {
            path: toml_file_path.display().to_string(),
            source,
        }
    })?;

    parse_templates(&content, toml_file_path)
}

/// 加载内置模板，并用文件中的模板扩展或覆盖
pub async fn load_registry(templates_file: Option<&Path>) -> Result<TemplateRegistry, ConfigError> {
    let mut registry = TemplateRegistry::builtin();

    if let Some(path) = templates_file {
        let templates = load_templates(path).await?;
        tracing::info!(
            "从 {} 加载了 {} 个查询模板",
            path.file_name().unwrap_or_default().to_string_lossy(),
            templates.len()
        );
        registry.extend(templates);
    }

    Ok(registry)
}

fn parse_templates(content: &str, path: &Path) -> Result<Vec<QueryTemplate>, ConfigError> {
    let file: TemplateFile =
        toml::from_str(content).map_err(|source| ConfigError::TemplateParseFailed {
            path: path.display().to_string(),
            source,
        })?;
    Ok(file.templates)
}
