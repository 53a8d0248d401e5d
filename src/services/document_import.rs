//! 学生资料导入
//!
//! 把上传文档的文本写入表单的"学生别参考资料"字段

use std::path::Path;

use tracing::info;

use crate::error::ExtractionError;
use crate::infrastructure::extract_text;
use crate::models::{FormData, FormField};

/// 提取文档文本并替换 `student_data`，其他字段不变
pub async fn import_student_data(form: &FormData, path: &Path) -> Result<FormData, ExtractionError> {
    let text = extract_text(path).await?;
    info!(
        "📄 已导入学生资料: {} ({} 字符)",
        path.display(),
        text.chars().count()
    );
    Ok(form.with_field(FormField::StudentData, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_import_replaces_only_student_data() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "1. 김민준: 발표를 잘함").unwrap();

        let form = FormData::default()
            .with_field(FormField::Subject, "국어")
            .with_field(FormField::StudentData, "이전 자료");
        let imported = import_student_data(&form, file.path()).await.unwrap();

        assert_eq!(imported.student_data, "1. 김민준: 발표를 잘함");
        assert_eq!(imported.subject, "국어");
    }

    #[tokio::test]
    async fn test_import_unsupported_file_keeps_form() {
        let form = FormData::default().with_field(FormField::StudentData, "이전 자료");
        let result = import_student_data(&form, Path::new("학생.hwp")).await;

        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat { .. })));
        assert_eq!(form.student_data, "이전 자료");
    }
}
