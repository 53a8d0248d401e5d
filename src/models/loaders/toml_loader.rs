use crate::models::form::FormData;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载表单
///
/// 键名与保存文件一致（camelCase），缺省的键保持默认值。
pub async fn load_form_from_toml(toml_file_path: &Path) -> Result<FormData> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let form: FormData = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 长度超出滑块范围时按滑块规则修正
    let form = form.with_comment_length(form.comment_length);

    tracing::info!(
        "已加载表单: {} (学生数: {}, 教科: {})",
        toml_file_path.display(),
        form.student_count,
        form.subject
    );

    Ok(form)
}
