//! 生成结果
//!
//! 结果只保存一份按学生号排列的列表，每条记录自带评价等级；
//! 按等级分组的视图在需要时从列表投影出来，不单独维护。

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 评价等级（从高到低）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceLevel {
    VeryGood,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceLevel {
    /// 分组视图中的显示顺序
    pub const ALL: [PerformanceLevel; 4] = [
        PerformanceLevel::VeryGood,
        PerformanceLevel::Good,
        PerformanceLevel::Average,
        PerformanceLevel::NeedsImprovement,
    ];

    /// 模型返回的标签
    pub fn tag(self) -> &'static str {
        match self {
            PerformanceLevel::VeryGood => "veryGood",
            PerformanceLevel::Good => "good",
            PerformanceLevel::Average => "average",
            PerformanceLevel::NeedsImprovement => "needsImprovement",
        }
    }

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::VeryGood => "매우 잘함",
            PerformanceLevel::Good => "잘함",
            PerformanceLevel::Average => "보통",
            PerformanceLevel::NeedsImprovement => "노력 요함",
        }
    }

    /// 解析模型返回的标签；无法识别时归入"잘함"
    pub fn from_tag_lenient(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.tag() == tag)
            .unwrap_or(PerformanceLevel::Good)
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 一名学生的评语
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentComment {
    pub student_id: u32,
    pub comment: String,
    pub performance_level: PerformanceLevel,
}

/// 列表视图中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedComment {
    pub student_id: u32,
    pub comment: String,
}

impl From<&StudentComment> for NumberedComment {
    fn from(c: &StudentComment) -> Self {
        Self {
            student_id: c.student_id,
            comment: c.comment.clone(),
        }
    }
}

/// 按等级分组的视图
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedByPerformance {
    pub very_good: Vec<NumberedComment>,
    pub good: Vec<NumberedComment>,
    pub average: Vec<NumberedComment>,
    pub needs_improvement: Vec<NumberedComment>,
}

impl GroupedByPerformance {
    pub fn bucket(&self, level: PerformanceLevel) -> &[NumberedComment] {
        match level {
            PerformanceLevel::VeryGood => &self.very_good,
            PerformanceLevel::Good => &self.good,
            PerformanceLevel::Average => &self.average,
            PerformanceLevel::NeedsImprovement => &self.needs_improvement,
        }
    }

    fn bucket_mut(&mut self, level: PerformanceLevel) -> &mut Vec<NumberedComment> {
        match level {
            PerformanceLevel::VeryGood => &mut self.very_good,
            PerformanceLevel::Good => &mut self.good,
            PerformanceLevel::Average => &mut self.average,
            PerformanceLevel::NeedsImprovement => &mut self.needs_improvement,
        }
    }
}

/// 结果页使用的两种视图
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsView {
    pub numbered_list: Vec<NumberedComment>,
    pub grouped_by_performance: GroupedByPerformance,
}

/// 一次生成得到的全部评语
///
/// 保存时按 `{numberedList, groupedByPerformance}` 两种视图写出，
/// 读取时再从分组中还原每条记录的等级。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommentsView", into = "CommentsView")]
pub struct GeneratedComments {
    comments: Vec<StudentComment>,
}

impl From<GeneratedComments> for CommentsView {
    fn from(results: GeneratedComments) -> Self {
        results.view()
    }
}

impl From<CommentsView> for GeneratedComments {
    fn from(view: CommentsView) -> Self {
        let grouped = &view.grouped_by_performance;
        let level_of = |entry: &NumberedComment| {
            // 先找完全相同的条目，再只按学生号找；都找不到时归入"잘함"
            PerformanceLevel::ALL
                .into_iter()
                .find(|level| grouped.bucket(*level).contains(entry))
                .or_else(|| {
                    PerformanceLevel::ALL.into_iter().find(|level| {
                        grouped
                            .bucket(*level)
                            .iter()
                            .any(|c| c.student_id == entry.student_id)
                    })
                })
                .unwrap_or(PerformanceLevel::Good)
        };

        let comments = view
            .numbered_list
            .iter()
            .map(|entry| StudentComment {
                student_id: entry.student_id,
                comment: entry.comment.clone(),
                performance_level: level_of(entry),
            })
            .collect();
        Self { comments }
    }
}

impl GeneratedComments {
    pub fn new(comments: Vec<StudentComment>) -> Self {
        Self { comments }
    }

    pub fn comments(&self) -> &[StudentComment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// 查找学生当前的评语
    pub fn find(&self, student_id: u32) -> Option<&StudentComment> {
        self.comments.iter().find(|c| c.student_id == student_id)
    }

    pub fn numbered_list(&self) -> Vec<NumberedComment> {
        self.comments.iter().map(NumberedComment::from).collect()
    }

    pub fn grouped_by_performance(&self) -> GroupedByPerformance {
        let mut grouped = GroupedByPerformance::default();
        for c in &self.comments {
            grouped.bucket_mut(c.performance_level).push(c.into());
        }
        grouped
    }

    pub fn view(&self) -> CommentsView {
        CommentsView {
            numbered_list: self.numbered_list(),
            grouped_by_performance: self.grouped_by_performance(),
        }
    }

    /// 教师手动修改评语，返回新的结果
    ///
    /// 不校验文本内容；等级保持生成时的值。
    pub fn edit_comment(
        &self,
        student_id: u32,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        self.replace_comment(student_id, text)
    }

    /// 用改写后的评语替换原评语，返回新的结果
    ///
    /// 学生号重复时所有同号记录一起替换。
    pub fn replace_comment(
        &self,
        student_id: u32,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if self.find(student_id).is_none() {
            return Err(ValidationError::StudentNotFound { student_id });
        }
        let text = text.into();
        let comments = self
            .comments
            .iter()
            .map(|c| {
                if c.student_id == student_id {
                    StudentComment {
                        comment: text.clone(),
                        ..c.clone()
                    }
                } else {
                    c.clone()
                }
            })
            .collect();
        Ok(Self { comments })
    }

    /// 复制用格式：每行 "번호. 평어"
    pub fn format_numbered_list(&self) -> String {
        self.comments
            .iter()
            .map(|c| format!("{}. {}", c.student_id, c.comment))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 复制用格式：等级标题 + "- 번호: 평어"，空分组省略
    pub fn format_grouped_list(&self) -> String {
        let grouped = self.grouped_by_performance();
        PerformanceLevel::ALL
            .into_iter()
            .filter(|level| !grouped.bucket(*level).is_empty())
            .map(|level| {
                let lines: Vec<String> = grouped
                    .bucket(level)
                    .iter()
                    .map(|c| format!("- {}: {}", c.student_id, c.comment))
                    .collect();
                format!("{}\n{}", level.label(), lines.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
