use serde::{Deserialize, Serialize};

use super::{FormData, GeneratedComments};

/// 保存到本地的进度：表单 + 当前结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub form_data: FormData,
    pub results: GeneratedComments,
}
