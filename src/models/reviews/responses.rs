use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::PeerReview;

/// 创建互评响应
///
/// 同一 (essay, reviewer) 重复创建是幂等成功，`is_new = false`。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct ReviewCreateResponse {
    pub review: PeerReview,
    pub is_new: bool,
}

/// 互评列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct ReviewListResponse {
    pub items: Vec<PeerReview>,
}

/// 批量分析结果统计
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct BatchAnalyzeResponse {
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    pub skipped: i64,
}
