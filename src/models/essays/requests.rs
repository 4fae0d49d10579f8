use serde::Deserialize;
use ts_rs::TS;

/// 创建随笔请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct CreateEssayRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_public: bool,
}

/// 更新随笔请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct UpdateEssayRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

/// 随笔列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayListQuery {
    /// 可见性筛选；非本人列表时强制为 true
    pub public: Option<bool>,
    pub author_id: Option<i64>,
    pub exclude_author_id: Option<i64>,
    pub search: Option<String>,
}
