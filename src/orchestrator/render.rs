//! 终端显示
//!
//! 把状态渲染成文本，不做任何输出

use std::fmt::Write;

use crate::models::guidelines::length_preview;
use crate::models::{FormData, GeneratedComments, PerformanceLevel, Subject, CUSTOM_SUBJECT, INPUT_FIELDS};
use crate::services::prompt_builder::collect_guidelines;
use crate::workflow::{ResultsState, WizardState, WizardStep};

/// 步骤指示条，当前步骤加方括号
pub fn step_indicator(current: WizardStep) -> String {
    WizardStep::ALL
        .iter()
        .map(|step| {
            if *step == current {
                format!("[{}. {}]", step.number(), step.label())
            } else {
                format!(" {}. {} ", step.number(), step.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn subject_menu() -> String {
    let mut out = String::new();
    for (i, subject) in Subject::ALL.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", i + 1, subject);
    }
    let _ = write!(out, "  (목록에 없으면 '{}': subject <교과명>)", CUSTOM_SUBJECT);
    out
}

pub fn form_summary(form: &FormData) -> String {
    let mut out = String::new();
    for input in INPUT_FIELDS {
        let value = form.get(input.field).trim();
        let marker = if input.required { "*" } else { " " };
        let shown = if value.is_empty() {
            format!("({})", first_line(input.placeholder))
        } else if input.multiline {
            let lines = value.lines().count();
            if lines > 1 {
                format!("{} … ({}줄)", first_line(value), lines)
            } else {
                value.to_string()
            }
        } else {
            value.to_string()
        };
        let _ = writeln!(out, "{marker} {:<24} {}  [{}]", input.label, shown, input.field.key());
    }
    out.trim_end().to_string()
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// 第二步：规则列表 + 长度预览
pub fn guidelines_page(form: &FormData) -> String {
    let mut out = String::from("AI가 평어를 생성할 때 적용할 규칙입니다.\n");
    for guideline in collect_guidelines(form) {
        let _ = writeln!(out, "  - {guideline}");
    }
    let (head, tail) = length_preview(form.comment_length);
    let _ = writeln!(out, "\n평어 길이: 약 {}자", form.comment_length);
    let _ = write!(out, "  미리보기: 「{head}」{tail}");
    out
}

pub fn results_page(state: &WizardState) -> String {
    match state.results_state() {
        ResultsState::Empty => "아직 생성된 평어가 없습니다.".to_string(),
        ResultsState::Pending => "AI가 평어를 생성하고 있습니다. 잠시만 기다려 주세요...".to_string(),
        ResultsState::Failed(message) => {
            format!("오류가 발생했습니다: {message}\n'reset'으로 처음부터 다시 시작해 주세요.")
        }
        ResultsState::Ready(results) => comments_table(results),
    }
}

fn comments_table(results: &GeneratedComments) -> String {
    if results.is_empty() {
        return "생성된 평어가 없습니다.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "■ 번호 순 ({}명)", results.len());
    for c in results.comments() {
        let _ = writeln!(out, "  {:>3}. [{}] {}", c.student_id, c.performance_level, c.comment);
    }

    let grouped = results.grouped_by_performance();
    let counts = PerformanceLevel::ALL
        .iter()
        .map(|level| format!("{} {}명", level.label(), grouped.bucket(*level).len()))
        .collect::<Vec<_>>()
        .join(" / ");
    let _ = write!(out, "■ 평가 수준별: {counts}");
    out
}

/// 当前步骤的完整画面
pub fn screen(state: &WizardState) -> String {
    let body = match state.step() {
        WizardStep::InputForm => form_summary(state.form()),
        WizardStep::Guidelines => guidelines_page(state.form()),
        WizardStep::Results => results_page(state),
    };
    format!("\n{}\n{}\n{}", step_indicator(state.step()), "─".repeat(60), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormField, StudentComment};

    #[test]
    fn test_step_indicator_marks_current() {
        let line = step_indicator(WizardStep::Guidelines);
        assert!(line.contains("[2. 가이드라인 확인]"));
        assert!(line.contains(" 1. 정보 입력 "));
    }

    #[test]
    fn test_form_summary_marks_required_fields() {
        let form = FormData::default().with_field(FormField::Subject, "수학");
        let summary = form_summary(&form);
        assert!(summary.lines().any(|l| l.starts_with('*') && l.contains("수학")));
        assert!(summary.lines().any(|l| l.starts_with(' ') && l.contains("평가요소")));
    }

    #[test]
    fn test_results_page_counts_levels() {
        let state = WizardState::restore(crate::models::SavedSession {
            form_data: FormData::default(),
            results: GeneratedComments::new(vec![StudentComment {
                student_id: 1,
                comment: "X".to_string(),
                performance_level: PerformanceLevel::Average,
            }]),
        });
        let page = results_page(&state);
        assert!(page.contains("  1. [보통] X"));
        assert!(page.contains("보통 1명"));
        assert!(page.contains("매우 잘함 0명"));
    }

    #[test]
    fn test_guidelines_page_shows_length_preview() {
        let page = guidelines_page(&FormData::default().with_comment_length(50));
        assert!(page.contains("평어 길이: 약 50자"));
        assert!(page.contains("오차범위 ±10%"));
    }
}
