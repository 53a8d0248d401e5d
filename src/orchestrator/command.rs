//! 终端命令解析
//!
//! 纯函数，不读写终端，便于测试

use std::path::PathBuf;

use thiserror::Error;

use crate::models::FormField;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// "번호. 평어"
    Numbered,
    /// 按等级分组
    Grouped,
}

/// 一条终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// 重新显示当前步骤
    Show,
    /// 设置表单字段；没有值时进入多行输入
    Set {
        field: FormField,
        value: Option<String>,
    },
    /// 选择教科（菜单编号或名称）
    Subject(String),
    /// 从文档导入学生资料
    Import(PathBuf),
    /// 从 TOML 读取整个表单
    Load(PathBuf),
    Next,
    Back,
    Length(u32),
    /// 多行输入追加规则
    Custom,
    Generate,
    /// 手动修改一条评语
    Edit { student_id: u32, text: String },
    /// 让模型按要求改写一条评语
    Regen { student_id: u32, request: String },
    Save,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Reset,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("명령을 입력해 주세요. 'help'로 사용법을 볼 수 있습니다.")]
    Empty,
    #[error("알 수 없는 명령입니다: {0}")]
    Unknown(String),
    #[error("사용법: {usage}")]
    Usage { usage: &'static str },
    #[error("알 수 없는 항목입니다: {0}")]
    UnknownField(String),
    #[error("숫자를 입력해 주세요: {0}")]
    InvalidNumber(String),
}

pub const HELP_TEXT: &str = "\
명령어:
  show                       현재 단계 다시 보기
  set <항목> [값]            입력 항목 설정 (값을 생략하면 여러 줄 입력, '.'으로 끝)
  subject <번호|이름>        교과 선택
  import <파일>              학생별 참고 자료 불러오기 (.txt .csv .pdf .docx)
  load <파일.toml>           입력 정보를 TOML 파일에서 불러오기
  next / back                다음 / 이전 단계
  length <50-200>            평어 길이 설정
  custom                     추가 요청사항 입력 (여러 줄, '.'으로 끝)
  generate                   평어 생성
  edit <번호> <평어>         평어 직접 수정
  regen <번호> <요청사항>    AI로 평어 다시 생성
  save                       작업 저장
  export [list|group] [파일] 결과 내보내기
  reset                      처음부터 다시 시작
  quit                       종료";

impl Command {
    /// 解析一行输入
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "help" | "?" => Ok(Command::Help),
            "show" => Ok(Command::Show),
            "set" => parse_set(rest),
            "subject" => non_empty(rest, "subject <번호|이름>").map(|s| Command::Subject(s.to_string())),
            "import" => non_empty(rest, "import <파일>").map(|p| Command::Import(PathBuf::from(p))),
            "load" => non_empty(rest, "load <파일.toml>").map(|p| Command::Load(PathBuf::from(p))),
            "next" => Ok(Command::Next),
            "back" => Ok(Command::Back),
            "length" => non_empty(rest, "length <50-200>")
                .and_then(parse_number)
                .map(Command::Length),
            "custom" => Ok(Command::Custom),
            "generate" | "gen" => Ok(Command::Generate),
            "edit" => {
                let (student_id, text) = parse_id_and_text(rest, "edit <번호> <평어>")?;
                Ok(Command::Edit { student_id, text })
            }
            "regen" => {
                let (student_id, request) = parse_id_and_text(rest, "regen <번호> <요청사항>")?;
                Ok(Command::Regen {
                    student_id,
                    request,
                })
            }
            "save" => Ok(Command::Save),
            "export" => parse_export(rest),
            "reset" => Ok(Command::Reset),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn non_empty<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage { usage })
    } else {
        Ok(rest)
    }
}

fn parse_number(text: &str) -> Result<u32, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

fn parse_set(rest: &str) -> Result<Command, CommandError> {
    let rest = non_empty(rest, "set <항목> [값]")?;
    let (key, value) = match rest.split_once(char::is_whitespace) {
        Some((key, value)) => (key, Some(value.trim().to_string())),
        None => (rest, None),
    };
    let field = FormField::from_key(key).ok_or_else(|| CommandError::UnknownField(key.to_string()))?;
    Ok(Command::Set { field, value })
}

// 修改评语时允许空文本，改写要求的空白检查留给控制器
fn parse_id_and_text(rest: &str, usage: &'static str) -> Result<(u32, String), CommandError> {
    let rest = non_empty(rest, usage)?;
    let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((parse_number(id)?, text.trim().to_string()))
}

fn parse_export(rest: &str) -> Result<Command, CommandError> {
    let mut parts = rest.split_whitespace();
    let (format, path) = match parts.next() {
        None => (ExportFormat::Numbered, None),
        Some("list") => (ExportFormat::Numbered, parts.next()),
        Some("group") | Some("grouped") => (ExportFormat::Grouped, parts.next()),
        Some(path) => (ExportFormat::Numbered, Some(path)),
    };
    Ok(Command::Export {
        format,
        path: path.map(PathBuf::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("next"), Ok(Command::Next));
        assert_eq!(Command::parse("  BACK "), Ok(Command::Back));
        assert_eq!(Command::parse("gen"), Ok(Command::Generate));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_parse_set_with_and_without_value() {
        assert_eq!(
            Command::parse("set studentCount 25"),
            Ok(Command::Set {
                field: FormField::StudentCount,
                value: Some("25".to_string()),
            })
        );
        assert_eq!(
            Command::parse("set studentdata"),
            Ok(Command::Set {
                field: FormField::StudentData,
                value: None,
            })
        );
        assert_eq!(
            Command::parse("set grade 3"),
            Err(CommandError::UnknownField("grade".to_string()))
        );
    }

    #[test]
    fn test_parse_edit_and_regen() {
        assert_eq!(
            Command::parse("edit 3 발표를 잘함."),
            Ok(Command::Edit {
                student_id: 3,
                text: "발표를 잘함.".to_string(),
            })
        );
        assert_eq!(
            Command::parse("regen 2 좀 더 구체적으로"),
            Ok(Command::Regen {
                student_id: 2,
                request: "좀 더 구체적으로".to_string(),
            })
        );
        assert_eq!(
            Command::parse("regen two 더 짧게"),
            Err(CommandError::InvalidNumber("two".to_string()))
        );
        assert!(matches!(Command::parse("regen"), Err(CommandError::Usage { .. })));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(Command::parse("length 150"), Ok(Command::Length(150)));
        assert!(Command::parse("length long").is_err());
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            Command::parse("export"),
            Ok(Command::Export {
                format: ExportFormat::Numbered,
                path: None,
            })
        );
        assert_eq!(
            Command::parse("export group out.txt"),
            Ok(Command::Export {
                format: ExportFormat::Grouped,
                path: Some(PathBuf::from("out.txt")),
            })
        );
        assert_eq!(
            Command::parse("export out.txt"),
            Ok(Command::Export {
                format: ExportFormat::Numbered,
                path: Some(PathBuf::from("out.txt")),
            })
        );
    }

    #[test]
    fn test_parse_paths_keep_spaces() {
        assert_eq!(
            Command::parse("import 3학년 1반/학생 자료.docx"),
            Ok(Command::Import(PathBuf::from("3학년 1반/학생 자료.docx")))
        );
    }
}
