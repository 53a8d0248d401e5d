//! 向导控制器 - 流程层
//!
//! 核心职责：把状态转换和业务能力串起来
//!
//! - 生成：第二步 → 第三步，调用一次模型
//! - 改写：先找到原评语，再调用一次模型
//! - 保存 / 读取：委托给 `SessionStore`
//!
//! 生成和改写各自最多一个请求在处理中（Semaphore 单许可），
//! 第二个请求直接返回 `Busy`，不排队。

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::KeyValueStore;
use crate::services::{CommentModel, GenerationClient, SessionStore};
use crate::workflow::wizard_state::{WizardState, WizardStep};

pub struct WizardController<M, S> {
    generator: GenerationClient<M>,
    sessions: SessionStore<S>,
    generation_gate: Semaphore,
    regeneration_gate: Semaphore,
}

impl<M: CommentModel, S: KeyValueStore> WizardController<M, S> {
    pub fn new(generator: GenerationClient<M>, sessions: SessionStore<S>) -> Self {
        Self {
            generator,
            sessions,
            generation_gate: Semaphore::new(1),
            regeneration_gate: Semaphore::new(1),
        }
    }

    pub fn generator(&self) -> &GenerationClient<M> {
        &self.generator
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    /// 生成全部评语
    ///
    /// 步骤或表单不合法时返回错误、状态不变；
    /// 模型调用失败时返回处于失败状态的新状态。
    pub async fn generate(&self, state: &WizardState) -> AppResult<WizardState> {
        let pending = state.begin_generation()?;
        let _permit = self
            .generation_gate
            .try_acquire()
            .map_err(|_| AppError::Busy {
                operation: "generate",
            })?;

        let outcome = self.generator.generate(pending.form()).await;
        if let Err(e) = &outcome {
            warn!("❌ 评语生成失败: {}", e);
        }
        Ok(pending.with_generation_result(outcome))
    }

    /// 按修改要求改写一名学生的评语
    ///
    /// 找不到学生或要求为空时不调用模型；失败时原结果不变。
    pub async fn regenerate_comment(
        &self,
        state: &WizardState,
        student_id: u32,
        modification_request: &str,
    ) -> AppResult<WizardState> {
        if state.step() != WizardStep::Results {
            return Err(AppError::not_allowed(state.step(), "regen"));
        }
        let results = state.results().ok_or(ValidationError::NoResults)?;
        let original = results
            .find(student_id)
            .ok_or_else(|| AppError::student_not_found(student_id))?;
        if modification_request.trim().is_empty() {
            return Err(ValidationError::EmptyModificationRequest.into());
        }

        let _permit = self
            .regeneration_gate
            .try_acquire()
            .map_err(|_| AppError::Busy {
                operation: "regenerate",
            })?;

        let text = self
            .generator
            .regenerate_one(state.form(), &original.comment, modification_request.trim())
            .await?;
        info!("✓ 学生 {} 的评语已改写", student_id);
        state.replace_comment(student_id, text)
    }

    /// 保存当前表单和结果
    pub fn save(&self, state: &WizardState) -> AppResult<()> {
        let session = state.snapshot().ok_or(ValidationError::NoResults)?;
        self.sessions.save(&session)?;
        Ok(())
    }

    /// 读取上次保存的作业；没有保存时返回 `None`
    pub fn load(&self) -> AppResult<Option<WizardState>> {
        Ok(self.sessions.load()?.map(WizardState::restore))
    }

    pub fn has_saved_data(&self) -> bool {
        self.sessions.has_saved_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;
    use crate::error::NavigationError;
    use crate::models::FormField;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 回复前先让出一次执行权，便于测试并发请求
    struct SlowModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl CommentModel for SlowModel {
        async fn complete(&self, _prompt: &str, _temperature: f32) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(self.reply.clone())
        }
    }

    fn controller(reply: &str) -> WizardController<SlowModel, MemoryStore> {
        WizardController::new(
            GenerationClient::new(
                SlowModel {
                    reply: reply.to_string(),
                    calls: AtomicUsize::new(0),
                },
                0.8,
                0.7,
            ),
            SessionStore::new(MemoryStore::new()),
        )
    }

    fn guidelines_state() -> WizardState {
        WizardState::new()
            .update_field(FormField::StudentCount, "1")
            .update_field(FormField::Subject, "과학")
            .update_field(FormField::AchievementStandard, "[4과01-01]")
            .update_field(FormField::StudentData, "1. 관찰 기록이 꼼꼼함")
            .next()
            .unwrap()
    }

    const ONE_STUDENT: &str = r#"[{"studentId":1,"comment":"관찰 결과를 꼼꼼히 기록함.","performanceLevel":"veryGood"}]"#;

    #[tokio::test]
    async fn test_second_generation_is_busy() {
        let controller = controller(ONE_STUDENT);
        let state = guidelines_state();

        let (first, second) = tokio::join!(controller.generate(&state), controller.generate(&state));

        assert_eq!(first.unwrap().results().map(|r| r.len()), Some(1));
        assert!(matches!(second, Err(AppError::Busy { operation: "generate" })));
        assert_eq!(controller.generator().model().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generation_and_regeneration_gates_are_independent() {
        let controller = controller(ONE_STUDENT);
        let ready = controller.generate(&guidelines_state()).await.unwrap();
        let second = guidelines_state();

        let (regen, gen) = tokio::join!(
            controller.regenerate_comment(&ready, 1, "더 짧게"),
            controller.generate(&second)
        );
        assert!(regen.is_ok());
        assert!(gen.is_ok());
    }

    #[tokio::test]
    async fn test_generate_from_wrong_step_makes_no_call() {
        let controller = controller(ONE_STUDENT);
        let result = controller.generate(&WizardState::new()).await;

        assert!(matches!(result, Err(AppError::Navigation(_))));
        assert_eq!(controller.generator().model().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_request_makes_no_call() {
        let controller = controller(ONE_STUDENT);
        let ready = controller.generate(&guidelines_state()).await.unwrap();
        assert_eq!(ready.step(), WizardStep::Results);

        let result = controller.regenerate_comment(&ready, 1, "  ").await;
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::EmptyModificationRequest))
        ));
        assert_eq!(controller.generator().model().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_regenerate_after_back_makes_no_call() {
        let controller = controller(ONE_STUDENT);
        let ready = controller.generate(&guidelines_state()).await.unwrap();
        let guidelines = ready.back().unwrap();

        let result = controller.regenerate_comment(&guidelines, 1, "더 짧게").await;
        assert!(matches!(
            result,
            Err(AppError::Navigation(NavigationError::NotAllowed {
                from: WizardStep::Guidelines,
                action: "regen",
            }))
        ));
        assert_eq!(controller.generator().model().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_save_without_results_fails() {
        let controller = controller(ONE_STUDENT);
        assert!(controller.save(&guidelines_state()).is_err());
        assert!(!controller.has_saved_data());
    }
}
