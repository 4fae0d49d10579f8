use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Correction, ReviewCategory};

/// 创建互评请求
///
/// 未给出的类别分数取中性默认值 100。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct CreateReviewRequest {
    pub grammar_score: Option<i32>,
    pub style_score: Option<i32>,
    pub clarity_score: Option<i32>,
    pub structure_score: Option<i32>,
    pub content_score: Option<i32>,
    pub research_score: Option<i32>,
    pub review_comment: Option<String>,
}

/// 更新互评请求
///
/// `is_submitted = true` 即提交并锁定；批注只能通过 addCorrection 追加，
/// 不接受整表覆盖。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct UpdateReviewRequest {
    pub grammar_score: Option<i32>,
    pub style_score: Option<i32>,
    pub clarity_score: Option<i32>,
    pub structure_score: Option<i32>,
    pub content_score: Option<i32>,
    pub research_score: Option<i32>,
    pub review_comment: Option<String>,
    pub is_submitted: Option<bool>,
}

/// 追加批注请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct AddCorrectionRequest {
    pub category: ReviewCategory,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub text_start_index: i32,
    #[serde(default)]
    pub text_end_index: i32,
    pub comment: String,
}

impl AddCorrectionRequest {
    pub fn into_correction(self) -> Correction {
        Correction {
            category: self.category,
            selected_text: self.selected_text,
            text_start_index: self.text_start_index,
            text_end_index: self.text_end_index,
            comment: self.comment,
        }
    }
}
