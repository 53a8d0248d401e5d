//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 交互式应用
//! - 管理应用生命周期（初始化、运行）
//! - 读取终端命令并交给控制器
//!
//! ### `command` - 命令解析
//! ### `render` - 画面渲染
//!
//! ## 层次关系
//!
//! ```text
//! app (终端交互)
//!     ↓
//! workflow::WizardController (状态转换 + 业务调用)
//!     ↓
//! services (能力层：prompt / generation / session / import)
//!     ↓
//! infrastructure (基础设施：extractor / store)
//! ```

pub mod app;
pub mod command;
pub mod render;

pub use app::App;
pub use command::{Command, CommandError, ExportFormat};
