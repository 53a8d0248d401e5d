//! 评语生成 - 业务能力层
//!
//! 提示词构建 → 模型调用 → 回复校验，每个操作只调用一次模型，不重试

use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{FormData, GeneratedComments};
use crate::services::llm_service::CommentModel;
use crate::services::prompt_builder::{build_generation_prompt, build_regeneration_prompt};
use crate::services::reply_parser::parse_reply;
use crate::utils::logging::{log_generation_summary, truncate_text};

/// 评语生成客户端
pub struct GenerationClient<M> {
    model: M,
    generation_temperature: f32,
    regeneration_temperature: f32,
}

impl<M: CommentModel> GenerationClient<M> {
    pub fn new(model: M, generation_temperature: f32, regeneration_temperature: f32) -> Self {
        Self {
            model,
            generation_temperature,
            regeneration_temperature,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// 为全部学生生成评语
    ///
    /// 通信失败或回复不是 JSON 时返回通用的通信错误；
    /// 不完整的记录只记日志，不报告给调用方。
    pub async fn generate(&self, form: &FormData) -> AppResult<GeneratedComments> {
        let prompt = build_generation_prompt(form);
        info!(
            "🤖 开始生成评语 (学生数: {}, 教科: {}, 长度: {}字)",
            form.student_count, form.subject, form.comment_length
        );
        debug!("提示词长度: {} 字符", prompt.instruction.chars().count());

        let reply = self
            .model
            .complete(&prompt.instruction, self.generation_temperature)
            .await
            .map_err(|e| {
                warn!("评语生成失败: {:#}", e);
                AppError::generation_failed(e)
            })?;

        let parsed = parse_reply(&reply).map_err(|e| {
            warn!("模型回复不是合法 JSON: {} ({})", e, truncate_text(&reply, 80));
            AppError::generation_failed(e)
        })?;

        if parsed.not_an_array {
            warn!("模型回复不是数组，结果为空: {}", truncate_text(&reply, 80));
        }
        for rejected in &parsed.rejected {
            warn!(
                "跳过不完整的记录 #{} ({}): {}",
                rejected.index,
                rejected.reason,
                truncate_text(&rejected.raw.to_string(), 80)
            );
        }
        log_generation_summary(parsed.records.len(), parsed.rejected.len());

        Ok(parsed.into_comments())
    }

    /// 按教师的修改要求改写一条评语
    ///
    /// 调用方负责先找到原评语。
    pub async fn regenerate_one(
        &self,
        form: &FormData,
        original_comment: &str,
        modification_request: &str,
    ) -> AppResult<String> {
        let prompt = build_regeneration_prompt(form, original_comment, modification_request);
        info!("✏️ 改写评语: {}", truncate_text(modification_request, 40));

        let reply = self
            .model
            .complete(&prompt, self.regeneration_temperature)
            .await
            .map_err(|e| {
                warn!("评语改写失败: {:#}", e);
                AppError::regeneration_failed(e)
            })?;

        let text = clean_single_comment(&reply);
        if text.is_empty() {
            warn!("模型返回的改写结果为空");
            return Err(AppError::regeneration_failed("empty regeneration reply"));
        }
        Ok(text)
    }
}

/// 去掉首尾空白和模型偶尔加上的引号
fn clean_single_comment(reply: &str) -> String {
    let trimmed = reply.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
