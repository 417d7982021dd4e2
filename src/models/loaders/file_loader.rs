use crate::error::{AppError, AppResult};
use crate::models::catalog::Catalog;
use crate::models::homework::{ParsedStream, RawStream};
use crate::models::roster::{fake_roster, Gradebook, Roster};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// 读取整个文本文件
pub async fn read_text(path: &Path) -> AppResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}

/// 写入整个文本文件
pub async fn write_text(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

/// 读取 problems.csv 并构建题目目录
pub async fn load_catalog(path: &Path, book: &str) -> AppResult<Catalog> {
    let content = read_text(path).await?;
    let catalog = Catalog::parse(&content, book, &path.display().to_string())?;
    info!("📚 已加载题目目录: {} 道题 (教材 {})", catalog.len(), book);
    Ok(catalog)
}

/// 读取手写的 YAML 作业流
pub async fn load_raw_streams(path: &Path) -> AppResult<Vec<RawStream>> {
    let content = read_text(path).await?;
    let streams: Vec<RawStream> = serde_yaml::from_str(&content)
        .map_err(|e| AppError::yaml_parse_failed(path.display().to_string(), e))?;
    info!("✓ 读取到 {} 个作业流: {}", streams.len(), path.display());
    Ok(streams)
}

/// 读取 `parse-hw` 生成的 JSON
pub async fn load_parsed_streams(path: &Path) -> AppResult<Vec<ParsedStream>> {
    let content = read_text(path).await?;
    serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(path.display().to_string(), e))
}

/// 从成绩册读取花名册
///
/// `path` 为 `None` 时返回只有一名假学生的花名册。
pub async fn load_roster(path: Option<&Path>, fake_key: &str) -> AppResult<Roster> {
    let Some(path) = path else {
        return Ok(fake_roster(fake_key));
    };
    let content = read_text(path).await?;
    let gradebook: Gradebook = serde_json::from_str(&content)
        .map_err(|e| AppError::json_parse_failed(path.display().to_string(), e))?;
    let roster = gradebook.into_roster();
    info!("👥 花名册中有 {} 名学生", roster.len());
    Ok(roster)
}

/// 读取可选的 HTML 片段；未指定路径时返回空字符串
pub async fn load_optional_text(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(p) => read_text(p).await,
        None => Ok(String::new()),
    }
}

/// 在 `parent` 的各个子目录（按名称排序）中查找 `<标签>.tex`
///
/// 同一标签出现在多个子目录时取排序靠后的那个。读取失败只记录警告，该标签视为缺失。
pub async fn load_solution_sources(parent: &Path, labels: &[String]) -> AppResult<HashMap<String, String>> {
    let mut subdirs: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(parent)
        .await
        .map_err(|e| AppError::file_read_failed(parent.display().to_string(), e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(parent.display().to_string(), e))?
    {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();
    debug!("解答目录 {} 下有 {} 个子目录", parent.display(), subdirs.len());

    let mut sources = HashMap::new();
    for label in labels {
        for dir in &subdirs {
            let candidate = dir.join(format!("{}.tex", label));
            if !candidate.is_file() {
                continue;
            }
            match read_text(&candidate).await {
                Ok(text) => {
                    sources.insert(label.clone(), text);
                }
                Err(e) => warn!("⚠️ 读取解答失败: {}", e),
            }
        }
    }
    info!("📝 找到 {}/{} 道题的解答源文件", sources.len(), labels.len());
    Ok(sources)
}
