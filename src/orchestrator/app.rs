//! 交互式应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：检查配置、创建模型客户端和本地存储
//! 2. **开始画面**：有保存的作业时询问是否继续
//! 3. **命令循环**：读取命令 → 调用控制器 → 显示新状态
//!
//! 只做调度和输出，不做业务判断。

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::FileStore;
use crate::models::{load_form_from_toml, FormField, Subject};
use crate::orchestrator::command::{Command, ExportFormat, HELP_TEXT};
use crate::orchestrator::render;
use crate::services::{import_student_data, GenerationClient, LlmService, SessionStore};
use crate::utils::logging::log_startup;
use crate::workflow::{WizardController, WizardState};

/// 应用主结构
pub struct App {
    controller: WizardController<LlmService, FileStore>,
    state: WizardState,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config
            .validate()
            .context("LLM_API_KEY 환경 변수를 설정해 주세요")?;

        log_startup(&config);

        let generator = GenerationClient::new(
            LlmService::new(&config),
            config.generation_temperature,
            config.regeneration_temperature,
        );
        let sessions = SessionStore::new(FileStore::new(&config.data_dir));

        Ok(Self {
            controller: WizardController::new(generator, sessions),
            state: WizardState::new(),
        })
    }

    /// 运行交互循环，直到 quit 或输入结束
    pub async fn run(mut self) -> Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        self.start_screen(&mut input).await?;
        println!("{}", render::screen(&self.state));

        loop {
            let Some(line) = prompt(&mut input, "> ").await? else {
                break;
            };
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.handle(command, &mut input).await {
                println!("⚠️ {e:#}");
            }
        }

        info!("👋 程序结束");
        Ok(())
    }

    /// 开始画面：有保存的作业时询问是否继续
    async fn start_screen<R>(&mut self, input: &mut Lines<R>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        println!("AI 평어 작성 도우미\n성취기준과 평가 자료를 입력하면 학생별 평어를 만들어 드립니다.");
        if !self.controller.has_saved_data() {
            return Ok(());
        }

        let answer = prompt(input, "이전 작업이 있습니다. 불러올까요? (y/N) ").await?;
        if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
            self.load_saved();
        }
        Ok(())
    }

    fn load_saved(&mut self) {
        match self.controller.load() {
            Ok(Some(state)) => {
                println!("저장된 작업을 불러왔습니다.");
                self.state = state;
            }
            Ok(None) => println!("저장된 데이터가 없습니다."),
            Err(e) => println!("⚠️ {e}"),
        }
    }

    async fn handle<R>(&mut self, command: Command, input: &mut Lines<R>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        match command {
            Command::Help => println!("{HELP_TEXT}"),
            Command::Show => {}
            Command::Set { field, value } => {
                let value = match value {
                    Some(value) => value,
                    None => read_multiline(input, field.label()).await?,
                };
                self.state = self.state.update_field(field, value);
            }
            Command::Subject(choice) => {
                let subject = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(Subject::from_menu_index)
                    .map(|s| s.name().to_string())
                    .unwrap_or(choice);
                if !Subject::is_predefined(&subject) {
                    println!("직접 입력한 교과: {subject}\n{}", render::subject_menu());
                }
                self.state = self.state.update_field(FormField::Subject, subject);
            }
            Command::Import(path) => {
                let form = import_student_data(self.state.form(), &path)
                    .await
                    .map_err(AppError::from)?;
                self.state = self.state.with_form(form);
            }
            Command::Load(path) => {
                let form = load_form_from_toml(&path).await?;
                self.state = self.state.with_form(form);
            }
            Command::Next => self.state = self.state.next()?,
            Command::Back => self.state = self.state.back()?,
            Command::Length(length) => self.state = self.state.set_comment_length(length),
            Command::Custom => {
                let text = read_multiline(input, FormField::CustomGuidelines.label()).await?;
                self.state = self.state.update_field(FormField::CustomGuidelines, text);
            }
            Command::Generate => {
                println!("AI가 평어를 생성하고 있습니다. 잠시만 기다려 주세요...");
                self.state = self.controller.generate(&self.state).await?;
            }
            Command::Edit { student_id, text } => {
                self.state = self.state.edit_comment(student_id, text)?;
            }
            Command::Regen {
                student_id,
                request,
            } => {
                println!("{student_id}번 학생의 평어를 다시 생성하고 있습니다...");
                self.state = self
                    .controller
                    .regenerate_comment(&self.state, student_id, &request)
                    .await?;
            }
            Command::Save => {
                self.controller.save(&self.state)?;
                println!("작업이 저장되었습니다.");
                return Ok(());
            }
            Command::Export { format, path } => {
                self.export(format, path.as_deref()).await?;
                return Ok(());
            }
            Command::Reset => {
                self.state = self.state.reset();
                println!("처음부터 다시 시작합니다.");
                self.start_screen(input).await?;
            }
            Command::Quit => return Ok(()),
        }

        println!("{}", render::screen(&self.state));
        Ok(())
    }

    async fn export(&self, format: ExportFormat, path: Option<&Path>) -> Result<()> {
        let results = self
            .state
            .results()
            .ok_or(crate::error::ValidationError::NoResults)?;
        let text = match format {
            ExportFormat::Numbered => results.format_numbered_list(),
            ExportFormat::Grouped => results.format_grouped_list(),
        };

        match path {
            Some(path) => {
                tokio::fs::write(path, &text)
                    .await
                    .with_context(|| format!("파일을 쓸 수 없습니다: {}", path.display()))?;
                println!("{}에 저장했습니다.", path.display());
            }
            None => println!("{text}"),
        }
        Ok(())
    }
}

async fn prompt<R>(input: &mut Lines<R>, message: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    use std::io::Write;
    print!("{message}");
    if let Err(e) = std::io::stdout().flush() {
        warn!("刷新标准输出失败: {}", e);
    }
    Ok(input.next_line().await?)
}

/// 读取多行输入，单独一行 "." 结束
async fn read_multiline<R>(input: &mut Lines<R>, label: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    println!("{label} 입력 (끝내려면 '.'만 있는 줄을 입력하세요):");
    let mut lines = Vec::new();
    while let Some(line) = input.next_line().await? {
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
