//! 错误类型
//!
//! 按来源分层：输入校验 / 步骤导航 / 文件解析 / LLM 通信 / 本地存储 / 配置。
//! 面向教师显示的文字使用韩语。

use thiserror::Error;

use crate::workflow::WizardStep;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// 步骤切换错误
    #[error("{0}")]
    Navigation(#[from] NavigationError),
    /// 上传文件解析错误
    #[error("파일을 처리하는 중 오류가 발생했습니다: {0}")]
    Extraction(#[from] ExtractionError),
    /// LLM 服务错误
    #[error("{0}")]
    Llm(#[from] LlmError),
    /// 本地存储错误
    #[error("{0}")]
    Storage(#[from] StorageError),
    /// 配置错误
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 同类请求仍在处理中
    #[error("이미 진행 중인 작업이 있습니다: {operation}")]
    Busy { operation: &'static str },
}

/// 输入校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 必填项为空
    #[error("필수 항목을 입력해 주세요: {}", .labels.join(", "))]
    MissingRequiredFields { labels: Vec<&'static str> },
    /// 结果中找不到该学生
    #[error("수정할 학생의 기존 평어를 찾을 수 없습니다. (번호: {student_id})")]
    StudentNotFound { student_id: u32 },
    /// 修改请求为空
    #[error("수정 요청사항을 입력해 주세요.")]
    EmptyModificationRequest,
    /// 当前没有生成结果
    #[error("생성된 결과가 없습니다.")]
    NoResults,
}

/// 步骤切换错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("'{action}' 동작은 {from} 단계에서 사용할 수 없습니다.")]
    NotAllowed {
        from: WizardStep,
        action: &'static str,
    },
}

/// 上传文件解析错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 不支持的扩展名
    #[error("지원하지 않는 파일 형식입니다 ({extension}). .txt, .csv, .pdf, .docx 파일을 업로드해주세요.")]
    UnsupportedFormat { extension: String },
    /// 读取文件失败
    #[error("파일을 읽을 수 없습니다 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 文本文件不是 UTF-8
    #[error("텍스트 파일의 인코딩을 읽을 수 없습니다 ({path})")]
    InvalidEncoding { path: String },
    /// DOCX 解析失败
    #[error("DOCX 문서를 해석할 수 없습니다: {reason}")]
    Docx { reason: String },
    /// PDF 解析失败
    #[error("PDF 문서를 해석할 수 없습니다: {reason}")]
    Pdf { reason: String },
    /// 后台解析任务异常退出
    #[error("문서 처리 작업이 중단되었습니다: {reason}")]
    TaskAborted { reason: String },
}

/// LLM 服务错误
///
/// 对外只显示通用提示，具体原因保留在 source 中供日志使用。
#[derive(Debug, Error)]
pub enum LlmError {
    /// 批量生成失败（通信或 JSON 解析）
    #[error("AI 모델로부터 응답을 받는 데 실패했습니다.")]
    GenerationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 单条改写失败
    #[error("AI 모델과 통신 중 오류가 발생하여 평어를 수정하지 못했습니다.")]
    RegenerationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("저장된 데이터를 읽을 수 없습니다 ({key}): {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("데이터 저장에 실패했습니다. 저장 공간이 부족할 수 있습니다 ({key}): {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("저장된 데이터를 삭제할 수 없습니다 ({key}): {source}")]
    RemoveFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("저장할 데이터를 직렬화할 수 없습니다: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    /// 数据已损坏（已被删除）
    #[error("데이터를 불러오는 데 실패했습니다. 데이터가 손상되었을 수 있습니다: {source}")]
    Corrupt {
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("환경 변수 {var_name} 가 설정되지 않았습니다.")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 批量生成通信失败
    pub fn generation_failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AppError::Llm(LlmError::GenerationFailed {
            source: source.into(),
        })
    }

    /// 单条改写通信失败
    pub fn regeneration_failed(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Llm(LlmError::RegenerationFailed {
            source: source.into(),
        })
    }

    pub fn student_not_found(student_id: u32) -> Self {
        AppError::Validation(ValidationError::StudentNotFound { student_id })
    }

    pub fn not_allowed(from: WizardStep, action: &'static str) -> Self {
        AppError::Navigation(NavigationError::NotAllowed { from, action })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_labels() {
        let err = ValidationError::MissingRequiredFields {
            labels: vec!["학생 수", "교과"],
        };
        assert_eq!(err.to_string(), "필수 항목을 입력해 주세요: 학생 수, 교과");
    }

    #[test]
    fn test_llm_error_hides_transport_detail() {
        let err = AppError::generation_failed("connection reset by peer");
        assert_eq!(err.to_string(), "AI 모델로부터 응답을 받는 데 실패했습니다.");

        let source = std::error::Error::source(&err).and_then(|e| e.source());
        assert_eq!(source.map(|e| e.to_string()).as_deref(), Some("connection reset by peer"));
    }
}
