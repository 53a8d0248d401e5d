//! 向导状态 - 流程层
//!
//! 状态是不可变的值：每个操作都返回新的状态，旧状态保持不变。
//!
//! 步骤顺序：
//! 1. 정보 입력（填写表单）
//! 2. 가이드라인 확인（确认规则、调整长度）
//! 3. 결과 확인（查看、修改、改写评语）

use std::fmt;

use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{FormData, FormField, GeneratedComments, SavedSession};

/// 向导步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    InputForm = 1,
    Guidelines = 2,
    Results = 3,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::InputForm,
        WizardStep::Guidelines,
        WizardStep::Results,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::InputForm => "정보 입력",
            WizardStep::Guidelines => "가이드라인 확인",
            WizardStep::Results => "결과 확인",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}단계({})", self.number(), self.label())
    }
}

/// 结果页的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsState {
    /// 尚未生成
    #[default]
    Empty,
    /// 正在等待模型回复
    Pending,
    Ready(GeneratedComments),
    /// 生成失败，只能重新开始
    Failed(String),
}

/// 向导的完整状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    step: WizardStep,
    form: FormData,
    results: ResultsState,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn results_state(&self) -> &ResultsState {
        &self.results
    }

    /// 当前可用的生成结果
    pub fn results(&self) -> Option<&GeneratedComments> {
        match &self.results {
            ResultsState::Ready(results) => Some(results),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.results, ResultsState::Failed(_))
    }

    /// 第一步 → 第二步，必填项为空时不前进
    pub fn next(&self) -> AppResult<Self> {
        if self.step != WizardStep::InputForm {
            return Err(AppError::not_allowed(self.step, "next"));
        }
        self.form.validate()?;
        Ok(Self {
            step: WizardStep::Guidelines,
            ..self.clone()
        })
    }

    /// 返回上一步；第一步停在原地，生成失败后不能返回
    pub fn back(&self) -> AppResult<Self> {
        let step = match self.step {
            WizardStep::InputForm => WizardStep::InputForm,
            WizardStep::Guidelines => WizardStep::InputForm,
            WizardStep::Results if self.is_failed() => {
                return Err(AppError::not_allowed(self.step, "back"))
            }
            WizardStep::Results => WizardStep::Guidelines,
        };
        Ok(Self {
            step,
            ..self.clone()
        })
    }

    pub fn update_field(&self, field: FormField, value: impl Into<String>) -> Self {
        Self {
            form: self.form.with_field(field, value),
            ..self.clone()
        }
    }

    /// 设置评语长度（范围 50~200，步长 10）
    pub fn set_comment_length(&self, length: u32) -> Self {
        Self {
            form: self.form.with_comment_length(length),
            ..self.clone()
        }
    }

    /// 替换整个表单（导入文档、读取 TOML 后使用）
    pub fn with_form(&self, form: FormData) -> Self {
        Self {
            form,
            ..self.clone()
        }
    }

    /// 丢弃表单和结果，回到第一步
    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// 从保存的作业恢复，直接进入结果页
    pub fn restore(session: SavedSession) -> Self {
        Self {
            step: WizardStep::Results,
            form: session.form_data,
            results: ResultsState::Ready(session.results),
        }
    }

    /// 第二步 → 第三步，进入等待状态
    pub fn begin_generation(&self) -> AppResult<Self> {
        if self.step != WizardStep::Guidelines {
            return Err(AppError::not_allowed(self.step, "generate"));
        }
        self.form.validate()?;
        Ok(Self {
            step: WizardStep::Results,
            results: ResultsState::Pending,
            ..self.clone()
        })
    }

    /// 写入生成结果；失败时记录给教师看的提示
    pub fn with_generation_result(&self, outcome: AppResult<GeneratedComments>) -> Self {
        let results = match outcome {
            Ok(results) => ResultsState::Ready(results),
            Err(e) => ResultsState::Failed(e.to_string()),
        };
        Self {
            step: WizardStep::Results,
            results,
            ..self.clone()
        }
    }

    /// 教师手动修改一条评语
    pub fn edit_comment(&self, student_id: u32, text: impl Into<String>) -> AppResult<Self> {
        if self.step != WizardStep::Results {
            return Err(AppError::not_allowed(self.step, "edit"));
        }
        let results = self.results().ok_or(ValidationError::NoResults)?;
        Ok(Self {
            results: ResultsState::Ready(results.edit_comment(student_id, text)?),
            ..self.clone()
        })
    }

    /// 用改写结果替换一条评语
    pub fn replace_comment(&self, student_id: u32, text: impl Into<String>) -> AppResult<Self> {
        if self.step != WizardStep::Results {
            return Err(AppError::not_allowed(self.step, "regen"));
        }
        let results = self.results().ok_or(ValidationError::NoResults)?;
        Ok(Self {
            results: ResultsState::Ready(results.replace_comment(student_id, text)?),
            ..self.clone()
        })
    }

    /// 可保存的快照；没有结果时为 `None`
    pub fn snapshot(&self) -> Option<SavedSession> {
        self.results().map(|results| SavedSession {
            form_data: self.form.clone(),
            results: results.clone(),
        })
    }
}
