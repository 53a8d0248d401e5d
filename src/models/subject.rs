/// 教科枚举（输入步骤下拉列表中的预设教科）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    /// 国语
    Korean,
    /// 数学
    Math,
    /// 社会
    Social,
    /// 科学
    Science,
    /// 道德
    Ethics,
    /// 实科
    Practical,
    /// 体育
    PhysicalEducation,
    /// 音乐
    Music,
    /// 美术
    Art,
    /// 英语
    English,
    /// 正确的生活（低年级统合教科）
    RightLiving,
    /// 智慧的生活
    WiseLiving,
    /// 快乐的生活
    JoyfulLiving,
    /// 安全的生活
    SafeLiving,
    /// 创意体验活动
    CreativeActivities,
}

/// 下拉列表中"自定义输入"选项的显示文字
pub const CUSTOM_SUBJECT: &str = "임의입력";

impl Subject {
    /// 下拉列表中的顺序
    pub const ALL: [Subject; 15] = [
        Subject::Korean,
        Subject::Math,
        Subject::Social,
        Subject::Science,
        Subject::Ethics,
        Subject::Practical,
        Subject::PhysicalEducation,
        Subject::Music,
        Subject::Art,
        Subject::English,
        Subject::RightLiving,
        Subject::WiseLiving,
        Subject::JoyfulLiving,
        Subject::SafeLiving,
        Subject::CreativeActivities,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Korean => "국어",
            Subject::Math => "수학",
            Subject::Social => "사회",
            Subject::Science => "과학",
            Subject::Ethics => "도덕",
            Subject::Practical => "실과",
            Subject::PhysicalEducation => "체육",
            Subject::Music => "음악",
            Subject::Art => "미술",
            Subject::English => "영어",
            Subject::RightLiving => "바른 생활",
            Subject::WiseLiving => "슬기로운 생활",
            Subject::JoyfulLiving => "즐거운 생활",
            Subject::SafeLiving => "안전한 생활",
            Subject::CreativeActivities => "창체",
        }
    }

    /// 尝试从字符串解析教科（精确匹配，忽略首尾空白）
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|subject| subject.name() == s)
    }

    /// 按下拉列表序号（从 1 开始）选择
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// 表单中的教科是否为预设值；否则下拉列表显示为"自定义输入"
    pub fn is_predefined(s: &str) -> bool {
        Self::from_name(s).is_some()
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
