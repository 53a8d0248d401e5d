//! 模型回复校验
//!
//! 把模型返回的原始 JSON 一次性校验成有类型的记录，
//! 不合格的记录连同原因放进单独的列表，调用方决定怎么处理。

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value as JsonValue;

use crate::models::{GeneratedComments, PerformanceLevel, StudentComment};

/// 被丢弃的记录
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// 在回复数组中的位置（从 0 开始）
    pub index: usize,
    pub reason: RejectReason,
    pub raw: JsonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 数组元素不是对象
    NotAnObject,
    /// 缺少评语或评语为空
    MissingComment,
    /// 缺少评价等级
    MissingPerformanceLevel,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotAnObject => write!(f, "不是 JSON 对象"),
            RejectReason::MissingComment => write!(f, "缺少 comment"),
            RejectReason::MissingPerformanceLevel => write!(f, "缺少 performanceLevel"),
        }
    }
}

/// 校验结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    pub records: Vec<StudentComment>,
    pub rejected: Vec<RejectedRecord>,
    /// 回复是合法 JSON 但不是数组
    pub not_an_array: bool,
}

impl ParsedReply {
    pub fn into_comments(self) -> GeneratedComments {
        GeneratedComments::new(self.records)
    }
}

fn code_fence() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE
        .get_or_init(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").ok())
        .as_ref()
}

/// 去掉模型有时包在 JSON 外面的 Markdown 代码块
pub fn strip_code_fence(reply: &str) -> &str {
    match code_fence()
        .and_then(|re| re.captures(reply))
        .and_then(|c| c.get(1))
    {
        Some(inner) => inner.as_str(),
        None => reply.trim(),
    }
}

/// 解析模型回复文本
///
/// 文本不是 JSON 时返回错误；是 JSON 但不是数组时得到空结果。
pub fn parse_reply(reply: &str) -> Result<ParsedReply, serde_json::Error> {
    let value: JsonValue = serde_json::from_str(strip_code_fence(reply))?;
    Ok(validate_records(&value))
}

/// 校验已解析的 JSON
pub fn validate_records(value: &JsonValue) -> ParsedReply {
    let Some(items) = value.as_array() else {
        return ParsedReply {
            not_an_array: true,
            ..ParsedReply::default()
        };
    };

    let mut parsed = ParsedReply::default();
    for (index, item) in items.iter().enumerate() {
        match validate_record(index, item) {
            Ok(record) => parsed.records.push(record),
            Err(reason) => parsed.rejected.push(RejectedRecord {
                index,
                reason,
                raw: item.clone(),
            }),
        }
    }
    parsed
}

fn validate_record(index: usize, item: &JsonValue) -> Result<StudentComment, RejectReason> {
    let object = item.as_object().ok_or(RejectReason::NotAnObject)?;

    let comment = object
        .get("comment")
        .filter(|v| is_present(v))
        .map(comment_text)
        .ok_or(RejectReason::MissingComment)?;

    // 非字符串的等级与未知标签一样归入"잘함"
    let performance_level = object
        .get("performanceLevel")
        .filter(|v| is_present(v))
        .map(|v| v.as_str().map_or(PerformanceLevel::Good, PerformanceLevel::from_tag_lenient))
        .ok_or(RejectReason::MissingPerformanceLevel)?;

    // 学生号缺失或无法识别时按位置编号
    let student_id = object
        .get("studentId")
        .and_then(student_id_from_json)
        .unwrap_or(index as u32 + 1);

    Ok(StudentComment {
        student_id,
        comment,
        performance_level,
    })
}

/// null、空字符串、0、false 视为缺失
fn is_present(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64() != Some(0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn comment_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 接受整数、整数值的浮点数和数字字符串
fn student_id_from_json(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
