//! # Comment Writer
//!
//! 为小学教师生成学生评价评语（평어）的终端工具
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不认识业务数据
//! - `extractor` - 文档（txt / csv / pdf / docx）转文本
//! - `store` - 按键读写字节的本地存储
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `prompt_builder` - 表单 → 提示词
//! - `LlmService` - 调用模型
//! - `GenerationClient` - 生成 / 改写评语并校验回复
//! - `SessionStore` - 保存与恢复作业
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义向导的三个步骤
//! - `WizardState` - 不可变的向导状态
//! - `WizardController` - 状态转换 + 业务调用
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 终端交互
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{FormData, FormField, GeneratedComments, PerformanceLevel, SavedSession};
pub use orchestrator::App;
pub use services::{CommentModel, GenerationClient, LlmService, SessionStore};
pub use workflow::{WizardController, WizardState, WizardStep};
