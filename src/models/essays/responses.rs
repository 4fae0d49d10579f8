use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Essay;

/// 随笔列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayListResponse {
    pub items: Vec<Essay>,
}

/// 点赞切换响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct LikeToggleResponse {
    pub liked: bool,
}
