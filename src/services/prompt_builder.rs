//! 提示词构建 - 业务能力层
//!
//! 纯函数：相同的表单总是得到相同的提示词，不调用模型，不保存状态

use serde_json::{json, Value as JsonValue};

use crate::models::guidelines::{length_rule, CUSTOM_GUIDELINES_HEADER, DEFAULT_GUIDELINES};
use crate::models::{FormData, PerformanceLevel};

/// 可选字段为空时写入提示词的标记
pub const NOT_PROVIDED: &str = "제공되지 않음";

/// 批量生成用的提示词
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPrompt {
    /// 发给模型的完整指令
    pub instruction: String,
    /// 期望的输出结构（JSON Schema）
    pub output_schema: JsonValue,
}

/// 期望的模型输出：按学生号排序的记录数组
pub fn output_schema() -> JsonValue {
    let levels: Vec<&str> = PerformanceLevel::ALL.iter().map(|l| l.tag()).collect();
    json!({
        "type": "array",
        "description": "모든 학생에 대한 평어 목록입니다. 반드시 학생 번호 순서대로 정렬되어야 합니다.",
        "items": {
            "type": "object",
            "properties": {
                "studentId": {
                    "type": "integer",
                    "description": "학생의 고유 번호. 이 필드는 절대 누락되어서는 안 됩니다."
                },
                "comment": {
                    "type": "string",
                    "description": "생성된 학생별 평어"
                },
                "performanceLevel": {
                    "type": "string",
                    "description": "평가 수준. 'veryGood', 'good', 'average', 'needsImprovement' 중 하나여야 합니다.",
                    "enum": levels
                }
            },
            "required": ["studentId", "comment", "performanceLevel"]
        }
    })
}

/// 本次生成使用的全部规则：默认规则 + 教师追加规则 + 长度规则
pub fn collect_guidelines(form: &FormData) -> Vec<String> {
    let mut guidelines: Vec<String> = DEFAULT_GUIDELINES.iter().map(|g| g.to_string()).collect();

    if !form.custom_guidelines.trim().is_empty() {
        guidelines.push(CUSTOM_GUIDELINES_HEADER.to_string());
        guidelines.push(form.custom_guidelines.clone());
    }

    guidelines.push(length_rule(form.comment_length));
    guidelines
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

/// 构建批量生成的提示词
pub fn build_generation_prompt(form: &FormData) -> GenerationPrompt {
    let guidelines = collect_guidelines(form)
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n");

    let output_schema = output_schema();
    let schema_text = serde_json::to_string_pretty(&output_schema).unwrap_or_default();

    let instruction = format!(
        r#"초등학교 교사를 위한 학생별 평어 작성 AI로서, 아래 제공된 정보를 바탕으로 전문적이고 교육적인 평어를 생성해 주세요. 사용자가 입력한 내용은 절대 그대로 복사하지 말고, 모든 평어는 새롭게 작성해야 합니다.

### 평가 정보
- 학생 수: {student_count}
- 교과: {subject}
- 성취기준: {achievement_standard}
- 평가요소: {evaluation_factor}
- 평가과제: {evaluation_task}
- 채점기준: {scoring_criteria}
- 평가문제/학습지: {test_or_worksheet}
- 예시 문장: {example_sentences}
- 추가 자료: {additional_materials}

### 학생별 참고 자료
{student_data}

### 평어 작성 규칙 (반드시 엄수)
{guidelines}

### 출력 JSON 스키마
{schema_text}

### 최종 출력 지시 (가장 중요)
- 위의 모든 정보를 종합하여, 각 학생에 대한 평어를 작성해 주세요.
- 출력은 반드시 지정된 JSON 스키마를 완벽하게 따라야 하며, JSON 배열 외의 다른 내용은 출력하지 않습니다.
- 결과는 **학생 번호 순서대로 정렬된** JSON 배열이어야 합니다.
- 배열의 각 객체는 다음 세 가지 필드를 **반드시** 포함해야 합니다: 'studentId'(학생 번호), 'comment'(평어), 'performanceLevel'(평가 수준).
- **'studentId' 필드는 모든 학생 객체에 대해 절대적으로 필수입니다. 이 필드가 없으면 결과는 무효입니다.**
- 'performanceLevel' 필드에는 'veryGood', 'good', 'average', 'needsImprovement' 중 하나만 사용해야 합니다."#,
        student_count = form.student_count,
        subject = form.subject,
        achievement_standard = or_not_provided(&form.achievement_standard),
        evaluation_factor = or_not_provided(&form.evaluation_factor),
        evaluation_task = or_not_provided(&form.evaluation_task),
        scoring_criteria = or_not_provided(&form.scoring_criteria),
        test_or_worksheet = or_not_provided(&form.test_or_worksheet),
        example_sentences = or_not_provided(&form.example_sentences),
        additional_materials = or_not_provided(&form.additional_materials),
        student_data = form.student_data,
    );

    GenerationPrompt {
        instruction,
        output_schema,
    }
}

/// 构建单条改写的提示词
pub fn build_regeneration_prompt(
    form: &FormData,
    original_comment: &str,
    modification_request: &str,
) -> String {
    format!(
        r#"초등학교 교사를 위한 AI 조교로서, 아래 주어진 학생 평어에 대한 교사의 수정 요청을 반영하여 새로운 평어를 작성해 주세요.

### 기존 평가 정보 (참고용)
- 교과: {subject}
- 성취기준: {achievement_standard}

### 수정 대상 평어
"{original_comment}"

### 교사의 수정 요청사항
"{modification_request}"

### 지시사항
- 위의 '수정 요청사항'을 충실히 반영하여, '수정 대상 평어'를 개선한 **새로운 평어 하나만** 작성해 주세요.
- 결과물은 오직 완성된 평어 문장이어야 합니다. 어떠한 설명이나 줄바꿈, 따옴표도 포함하지 마세요.
- 기존 평어의 긍정적이고 전문적인 톤을 유지해야 합니다.
- 문장의 끝은 반드시 '~함', '~임' 등으로 마무리해야 합니다."#,
        subject = form.subject,
        achievement_standard = or_not_provided(&form.achievement_standard),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormField;

    fn math_form() -> FormData {
        FormData::default()
            .with_field(FormField::StudentCount, "2")
            .with_field(FormField::Subject, "Math")
            .with_field(FormField::StudentData, "1. A, 2. B")
    }

    #[test]
    fn test_prompt_embeds_context_and_not_provided_markers() {
        let prompt = build_generation_prompt(&math_form());

        assert!(prompt.instruction.contains("- 학생 수: 2"));
        assert!(prompt.instruction.contains("- 교과: Math"));
        assert!(prompt.instruction.contains("1. A, 2. B"));
        assert!(prompt.instruction.contains(&format!("- 평가요소: {NOT_PROVIDED}")));
        assert!(prompt.instruction.contains(&format!("- 추가 자료: {NOT_PROVIDED}")));
    }

    #[test]
    fn test_whitespace_only_optional_field_is_not_provided() {
        let form = math_form().with_field(FormField::EvaluationTask, "  \n ");
        let prompt = build_generation_prompt(&form);
        assert!(prompt.instruction.contains(&format!("- 평가과제: {NOT_PROVIDED}")));
    }

    #[test]
    fn test_guidelines_include_defaults_and_length_rule_last() {
        let guidelines = collect_guidelines(&math_form().with_comment_length(150));
        assert_eq!(guidelines.len(), DEFAULT_GUIDELINES.len() + 1);
        assert_eq!(guidelines.last().map(String::as_str), Some(length_rule(150).as_str()));
    }

    #[test]
    fn test_custom_guidelines_follow_separator() {
        let form = math_form().with_field(FormField::CustomGuidelines, "칭찬을 더 많이 해 주세요.");
        let guidelines = collect_guidelines(&form);
        let n = DEFAULT_GUIDELINES.len();

        assert_eq!(guidelines.len(), n + 3);
        assert_eq!(guidelines[n], CUSTOM_GUIDELINES_HEADER);
        assert_eq!(guidelines[n + 1], "칭찬을 더 많이 해 주세요.");
        assert!(build_generation_prompt(&form)
            .instruction
            .contains("- 칭찬을 더 많이 해 주세요."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_generation_prompt(&math_form()), build_generation_prompt(&math_form()));
    }

    #[test]
    fn test_schema_requires_all_three_fields() {
        let schema = output_schema();
        assert_eq!(schema["type"], "array");
        assert_eq!(
            schema["items"]["required"],
            json!(["studentId", "comment", "performanceLevel"])
        );
        assert_eq!(
            schema["items"]["properties"]["performanceLevel"]["enum"],
            json!(["veryGood", "good", "average", "needsImprovement"])
        );
    }

    #[test]
    fn test_regeneration_prompt_quotes_original_and_request() {
        let prompt = build_regeneration_prompt(&math_form(), "덧셈을 잘함.", "좀 더 구체적으로");
        assert!(prompt.contains("\"덧셈을 잘함.\""));
        assert!(prompt.contains("\"좀 더 구체적으로\""));
        assert!(prompt.contains("- 교과: Math"));
    }
}
