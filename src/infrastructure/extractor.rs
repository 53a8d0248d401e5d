//! 文档文本提取 - 基础设施层
//!
//! 输入文件路径，输出纯文本；不关心文本写到表单的哪个字段

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ExtractionError;

/// 支持上传的文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Csv,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// 按扩展名判断格式（不区分大小写）
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(DocumentFormat::Txt),
            "csv" => Ok(DocumentFormat::Csv),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ExtractionError::UnsupportedFormat { extension }),
        }
    }
}

/// 读取文档并提取文本
///
/// 扩展名不支持时在读取文件之前就返回错误。
pub async fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let format = DocumentFormat::from_path(path)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractionError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

    debug!("提取 {:?} 文本: {} ({} 字节)", format, path.display(), bytes.len());

    match format {
        DocumentFormat::Txt | DocumentFormat::Csv => {
            String::from_utf8(bytes).map_err(|_| ExtractionError::InvalidEncoding {
                path: path.display().to_string(),
            })
        }
        // 解析是 CPU 密集的同步操作，放到阻塞线程池
        DocumentFormat::Docx => run_blocking(move || extract_docx_text(&bytes)).await,
        DocumentFormat::Pdf => run_blocking(move || extract_pdf_text(&bytes)).await,
    }
}

async fn run_blocking<F>(f: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractionError::TaskAborted {
            reason: e.to_string(),
        })?
}

/// 从 DOCX（zip 包中的 word/document.xml）提取正文
///
/// 段落结束换行，`w:tab` 转为制表符，`w:br` 转为换行。
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx_err = |reason: String| ExtractionError::Docx { reason };

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| docx_err(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    // 只收集 <w:t> 内的文字，标签之间的空白不属于正文
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::Text(e)) if in_run_text => {
                let unescaped = e.unescape().map_err(|e| docx_err(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(docx_err(format!(
                    "XML 오류 (위치 {}): {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Ok(text.trim_end().to_string())
}

/// 从 PDF 提取文本（逐页拼接）
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map(|text| text.trim_end().to_string())
        .map_err(|e| ExtractionError::Pdf {
            reason: e.to_string(),
        })
}
