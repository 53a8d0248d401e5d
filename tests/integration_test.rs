use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use comment_writer::error::{LlmError, StorageError, ValidationError};
use comment_writer::infrastructure::{FileStore, KeyValueStore, MemoryStore};
use comment_writer::services::STORAGE_KEY;
use comment_writer::workflow::ResultsState;
use comment_writer::{
    AppError, CommentModel, FormField, GenerationClient, PerformanceLevel, SessionStore,
    WizardController, WizardState, WizardStep,
};

/// 按顺序返回预设回复的假模型，并记录收到的提示词
struct FakeModel {
    replies: Mutex<Vec<anyhow::Result<String>>>,
    prompts: Mutex<Vec<(String, f32)>>,
    calls: AtomicUsize,
}

impl FakeModel {
    fn new(replies: Vec<anyhow::Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> Option<(String, f32)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl CommentModel for FakeModel {
    async fn complete(&self, prompt: &str, temperature: f32) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))
    }
}

const MATH_REPLY: &str = r#"[
    {"studentId": 1, "comment": "X", "performanceLevel": "good"},
    {"studentId": 2, "comment": "Y", "performanceLevel": "needsImprovement"}
]"#;

fn controller<S: KeyValueStore>(
    replies: Vec<anyhow::Result<String>>,
    store: S,
) -> WizardController<FakeModel, S> {
    WizardController::new(
        GenerationClient::new(FakeModel::new(replies), 0.8, 0.7),
        SessionStore::new(store),
    )
}

fn math_input() -> WizardState {
    WizardState::new()
        .update_field(FormField::StudentCount, "2")
        .update_field(FormField::Subject, "Math")
        .update_field(FormField::AchievementStandard, "[4수01-05] 분수의 덧셈을 할 수 있다.")
        .update_field(FormField::StudentData, "1. A, 2. B")
}

#[tokio::test]
async fn test_full_wizard_flow() {
    let controller = controller(
        vec![Ok(MATH_REPLY.to_string()), Ok("분수의 덧셈 원리를 설명할 수 있음.".to_string())],
        MemoryStore::new(),
    );

    let guidelines = math_input().set_comment_length(120).next().unwrap();
    assert_eq!(guidelines.step(), WizardStep::Guidelines);

    let results = controller.generate(&guidelines).await.unwrap();
    assert_eq!(results.step(), WizardStep::Results);
    let (prompt, temperature) = controller.generator().model().last_prompt().unwrap();
    assert!(prompt.contains("- 학생 수: 2"));
    assert!(prompt.contains("약 120자 내외"));
    assert_eq!(temperature, 0.8);

    let view = results.results().unwrap().view();
    assert_eq!(view.numbered_list.len(), 2);
    assert_eq!(view.grouped_by_performance.good[0].student_id, 1);
    assert_eq!(view.grouped_by_performance.needs_improvement[0].student_id, 2);

    let edited = results.edit_comment(1, "계산이 정확함.").unwrap();
    let regenerated = controller
        .regenerate_comment(&edited, 2, "더 구체적으로")
        .await
        .unwrap();
    let (prompt, temperature) = controller.generator().model().last_prompt().unwrap();
    assert!(prompt.contains("\"Y\""));
    assert!(prompt.contains("\"더 구체적으로\""));
    assert_eq!(temperature, 0.7);

    let final_results = regenerated.results().unwrap();
    assert_eq!(final_results.find(1).unwrap().comment, "계산이 정확함.");
    assert_eq!(
        final_results.find(2).unwrap().comment,
        "분수의 덧셈 원리를 설명할 수 있음."
    );
    assert_eq!(
        final_results.find(2).unwrap().performance_level,
        PerformanceLevel::NeedsImprovement
    );
    assert_eq!(
        final_results.format_numbered_list(),
        "1. 계산이 정확함.\n2. 분수의 덧셈 원리를 설명할 수 있음."
    );
    assert_eq!(controller.generator().model().calls(), 2);
}

#[tokio::test]
async fn test_navigation_blocked_without_required_fields() {
    let controller = controller(vec![Ok(MATH_REPLY.to_string())], MemoryStore::new());
    let incomplete = math_input().update_field(FormField::StudentData, "  ");

    match incomplete.next() {
        Err(AppError::Validation(ValidationError::MissingRequiredFields { labels })) => {
            assert_eq!(labels, vec!["학생별 참고 자료"]);
        }
        other => panic!("unexpected: {:?}", other),
    }

    assert!(controller.generate(&incomplete).await.is_err());
    assert_eq!(controller.generator().model().calls(), 0);
}

#[tokio::test]
async fn test_regenerate_unknown_student_makes_no_call() {
    let controller = controller(vec![Ok(MATH_REPLY.to_string())], MemoryStore::new());
    let results = controller
        .generate(&math_input().next().unwrap())
        .await
        .unwrap();

    let err = controller
        .regenerate_comment(&results, 7, "더 짧게")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::StudentNotFound { student_id: 7 })
    ));
    assert_eq!(controller.generator().model().calls(), 1);
}

#[tokio::test]
async fn test_regeneration_failure_keeps_batch() {
    let controller = controller(
        vec![Ok(MATH_REPLY.to_string()), Err(anyhow::anyhow!("503"))],
        MemoryStore::new(),
    );
    let results = controller
        .generate(&math_input().next().unwrap())
        .await
        .unwrap();

    let err = controller
        .regenerate_comment(&results, 1, "더 짧게")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Llm(LlmError::RegenerationFailed { .. })));
    assert_eq!(results.results().unwrap().find(1).unwrap().comment, "X");
}

#[tokio::test]
async fn test_generation_failure_enters_error_state() {
    let controller = controller(vec![Err(anyhow::anyhow!("timeout"))], MemoryStore::new());
    let failed = controller
        .generate(&math_input().next().unwrap())
        .await
        .unwrap();

    assert_eq!(failed.step(), WizardStep::Results);
    match failed.results_state() {
        ResultsState::Failed(message) => {
            assert_eq!(message, "AI 모델로부터 응답을 받는 데 실패했습니다.")
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(failed.back().is_err());
    assert_eq!(failed.reset().step(), WizardStep::InputForm);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let controller = controller(vec![Ok(MATH_REPLY.to_string())], FileStore::new(dir.path()));

    let results = tokio_test::block_on(controller.generate(&math_input().next().unwrap())).unwrap();
    let edited = results.edit_comment(2, "노력하는 모습이 보임.").unwrap();
    controller.save(&edited).unwrap();
    assert!(controller.has_saved_data());

    let restored = controller.load().unwrap().unwrap();
    assert_eq!(restored.step(), WizardStep::Results);
    assert_eq!(restored.form(), edited.form());
    assert_eq!(restored.results(), edited.results());
}

#[test]
fn test_load_without_saved_data() {
    let controller = controller(vec![], MemoryStore::new());
    assert!(!controller.has_saved_data());
    assert_eq!(controller.load().unwrap(), None);
}

#[test]
fn test_corrupt_save_is_cleared() {
    let store = MemoryStore::new();
    store.set(STORAGE_KEY, b"{\"formData\": 3").unwrap();
    let controller = controller(vec![], store);

    assert!(matches!(
        controller.load(),
        Err(AppError::Storage(StorageError::Corrupt { .. }))
    ));
    assert_eq!(controller.load().unwrap(), None);
}
