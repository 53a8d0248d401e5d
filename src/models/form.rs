//! 教师输入的评价信息

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 评语长度滑块的范围（字数）
pub const MIN_COMMENT_LENGTH: u32 = 50;
pub const MAX_COMMENT_LENGTH: u32 = 200;
pub const COMMENT_LENGTH_STEP: u32 = 10;
pub const DEFAULT_COMMENT_LENGTH: u32 = 100;

/// 表单数据
///
/// 整个会话只有一份；重置时整体替换为默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    #[serde(deserialize_with = "deserialize_student_count")]
    pub student_count: String,
    pub subject: String,
    pub achievement_standard: String,
    pub evaluation_factor: String,
    pub evaluation_task: String,
    pub scoring_criteria: String,
    pub test_or_worksheet: String,
    pub student_data: String,
    pub example_sentences: String,
    pub additional_materials: String,
    pub custom_guidelines: String,
    pub comment_length: u32,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            student_count: String::new(),
            subject: String::new(),
            achievement_standard: String::new(),
            evaluation_factor: String::new(),
            evaluation_task: String::new(),
            scoring_criteria: String::new(),
            test_or_worksheet: String::new(),
            student_data: String::new(),
            example_sentences: String::new(),
            additional_materials: String::new(),
            custom_guidelines: String::new(),
            comment_length: DEFAULT_COMMENT_LENGTH,
        }
    }
}

// 学生数在 TOML 里可以写成字符串或整数
fn deserialize_student_count<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer student count")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// 表单中的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    StudentCount,
    Subject,
    AchievementStandard,
    EvaluationFactor,
    EvaluationTask,
    ScoringCriteria,
    TestOrWorksheet,
    StudentData,
    ExampleSentences,
    AdditionalMaterials,
    CustomGuidelines,
}

/// 输入步骤中一个输入框的描述
#[derive(Debug, Clone, Copy)]
pub struct InputField {
    pub field: FormField,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub multiline: bool,
    pub required: bool,
}

/// 输入步骤显示的字段（自定义规则在第二步单独编辑）
pub const INPUT_FIELDS: &[InputField] = &[
    InputField {
        field: FormField::StudentCount,
        label: "학생 수",
        placeholder: "예: 25",
        multiline: false,
        required: true,
    },
    InputField {
        field: FormField::Subject,
        label: "교과",
        placeholder: "예: 국어, 수학",
        multiline: false,
        required: true,
    },
    InputField {
        field: FormField::AchievementStandard,
        label: "성취기준",
        placeholder: "예: [4국01-01] 경험한 일을 나타내는 글을 쓸 때 겪은 일과 생각이나 느낌이 잘 드러나게 쓴다.",
        multiline: true,
        required: true,
    },
    InputField {
        field: FormField::EvaluationFactor,
        label: "평가요소",
        placeholder: "예: 경험과 생각의 연결성, 표현의 적절성",
        multiline: true,
        required: false,
    },
    InputField {
        field: FormField::EvaluationTask,
        label: "평가과제",
        placeholder: "예: 소중한 경험을 담은 그림일기 쓰기",
        multiline: true,
        required: false,
    },
    InputField {
        field: FormField::ScoringCriteria,
        label: "채점기준",
        placeholder: "예: 상: 경험과 느낌을 구체적으로 표현함. 중: 경험은 드러나나 느낌 표현이 부족함. 하: 내용이 빈약함.",
        multiline: true,
        required: false,
    },
    InputField {
        field: FormField::TestOrWorksheet,
        label: "평가문제 또는 학습지 내용",
        placeholder: "학습지나 평가문제의 핵심 내용을 입력하세요.",
        multiline: true,
        required: false,
    },
    InputField {
        field: FormField::StudentData,
        label: "학생별 참고 자료",
        placeholder: "예:\n1번 김민준, 매우 잘함, 모든 문항 정답\n2번 이서연, 잘함, 3번 문항 오답\n(표 형식의 데이터를 붙여넣거나 직접 입력하세요)",
        multiline: true,
        required: true,
    },
    InputField {
        field: FormField::ExampleSentences,
        label: "예시 문장",
        placeholder: "원하는 스타일의 예시 문장을 1~2개 입력하면 AI가 참고합니다. (선택 사항)",
        multiline: true,
        required: false,
    },
    InputField {
        field: FormField::AdditionalMaterials,
        label: "추가 자료",
        placeholder: "평어 작성에 참고할 추가 자료가 있다면 입력하세요. (선택 사항)",
        multiline: true,
        required: false,
    },
];

impl FormField {
    /// 命令行中使用的字段名（与保存文件中的键一致）
    pub fn key(self) -> &'static str {
        match self {
            FormField::StudentCount => "studentCount",
            FormField::Subject => "subject",
            FormField::AchievementStandard => "achievementStandard",
            FormField::EvaluationFactor => "evaluationFactor",
            FormField::EvaluationTask => "evaluationTask",
            FormField::ScoringCriteria => "scoringCriteria",
            FormField::TestOrWorksheet => "testOrWorksheet",
            FormField::StudentData => "studentData",
            FormField::ExampleSentences => "exampleSentences",
            FormField::AdditionalMaterials => "additionalMaterials",
            FormField::CustomGuidelines => "customGuidelines",
        }
    }

    /// 按字段名查找（不区分大小写）
    pub fn from_key(key: &str) -> Option<Self> {
        const ALL: [FormField; 11] = [
            FormField::StudentCount,
            FormField::Subject,
            FormField::AchievementStandard,
            FormField::EvaluationFactor,
            FormField::EvaluationTask,
            FormField::ScoringCriteria,
            FormField::TestOrWorksheet,
            FormField::StudentData,
            FormField::ExampleSentences,
            FormField::AdditionalMaterials,
            FormField::CustomGuidelines,
        ];
        ALL.into_iter().find(|f| f.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::CustomGuidelines => "추가 요청사항",
            other => INPUT_FIELDS
                .iter()
                .find(|f| f.field == other)
                .map(|f| f.label)
                .unwrap_or_else(|| other.key()),
        }
    }
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::StudentCount => &self.student_count,
            FormField::Subject => &self.subject,
            FormField::AchievementStandard => &self.achievement_standard,
            FormField::EvaluationFactor => &self.evaluation_factor,
            FormField::EvaluationTask => &self.evaluation_task,
            FormField::ScoringCriteria => &self.scoring_criteria,
            FormField::TestOrWorksheet => &self.test_or_worksheet,
            FormField::StudentData => &self.student_data,
            FormField::ExampleSentences => &self.example_sentences,
            FormField::AdditionalMaterials => &self.additional_materials,
            FormField::CustomGuidelines => &self.custom_guidelines,
        }
    }

    /// 返回替换了一个字段的新表单
    pub fn with_field(&self, field: FormField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            FormField::StudentCount => &mut next.student_count,
            FormField::Subject => &mut next.subject,
            FormField::AchievementStandard => &mut next.achievement_standard,
            FormField::EvaluationFactor => &mut next.evaluation_factor,
            FormField::EvaluationTask => &mut next.evaluation_task,
            FormField::ScoringCriteria => &mut next.scoring_criteria,
            FormField::TestOrWorksheet => &mut next.test_or_worksheet,
            FormField::StudentData => &mut next.student_data,
            FormField::ExampleSentences => &mut next.example_sentences,
            FormField::AdditionalMaterials => &mut next.additional_materials,
            FormField::CustomGuidelines => &mut next.custom_guidelines,
        };
        *slot = value.into();
        next
    }

    /// 返回设置了评语长度的新表单（限制在滑块范围内并取整到步长）
    pub fn with_comment_length(&self, length: u32) -> Self {
        let clamped = length.clamp(MIN_COMMENT_LENGTH, MAX_COMMENT_LENGTH);
        let snapped = (clamped + COMMENT_LENGTH_STEP / 2) / COMMENT_LENGTH_STEP * COMMENT_LENGTH_STEP;
        Self {
            comment_length: snapped.min(MAX_COMMENT_LENGTH),
            ..self.clone()
        }
    }

    /// 去掉首尾空白后仍为空的必填项
    pub fn missing_required(&self) -> Vec<&'static str> {
        INPUT_FIELDS
            .iter()
            .filter(|f| f.required && self.get(f.field).trim().is_empty())
            .map(|f| f.label)
            .collect()
    }

    /// 检查输入步骤是否可以进入下一步
    pub fn validate(&self) -> Result<(), ValidationError> {
        let labels = self.missing_required();
        if labels.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequiredFields { labels })
        }
    }

    pub fn is_input_step_valid(&self) -> bool {
        self.missing_required().is_empty()
    }
}
