//! 互评业务实体
//!
//! 评审者身份建模为标签联合：人类评审携带用户 ID，自动评审（AI）
//! 是独立变体，存储层以 NULL 列表示，业务层不出现魔法字符串。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{EssayHubError, Result};

// 评审类别（六个维度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub enum ReviewCategory {
    Grammar,
    Style,
    Clarity,
    Structure,
    Content,
    Research,
}

impl std::fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReviewCategory::Grammar => "grammar",
            ReviewCategory::Style => "style",
            ReviewCategory::Clarity => "clarity",
            ReviewCategory::Structure => "structure",
            ReviewCategory::Content => "content",
            ReviewCategory::Research => "research",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ReviewCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "grammar" => Ok(ReviewCategory::Grammar),
            "style" => Ok(ReviewCategory::Style),
            "clarity" => Ok(ReviewCategory::Clarity),
            "structure" => Ok(ReviewCategory::Structure),
            "content" => Ok(ReviewCategory::Content),
            "research" => Ok(ReviewCategory::Research),
            _ => Err(format!(
                "无效的评审类别: '{s}'. 支持: grammar, style, clarity, structure, content, research"
            )),
        }
    }
}

// 评审者身份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub enum Reviewer {
    Human(i64),
    Automated,
}

impl Reviewer {
    /// 从存储列还原（NULL 表示自动评审）
    pub fn from_column(reviewer_id: Option<i64>) -> Self {
        match reviewer_id {
            Some(id) => Reviewer::Human(id),
            None => Reviewer::Automated,
        }
    }

    /// 转为存储列
    pub fn to_column(self) -> Option<i64> {
        match self {
            Reviewer::Human(id) => Some(id),
            Reviewer::Automated => None,
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, Reviewer::Automated)
    }
}

/// 行内批注
///
/// 偏移是创建时刻针对随笔内容计算的字节偏移；内容在存在评审后不可再
/// 编辑（见 EssayContentLocked），因此锚点不会漂移。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct Correction {
    pub category: ReviewCategory,
    pub selected_text: String,
    pub text_start_index: i32,
    pub text_end_index: i32,
    pub comment: String,
}

impl Correction {
    /// 校验批注是否能合法锚定到给定内容
    ///
    /// 空选区要求偏移为 (0, 0)；非空选区要求 0 <= start <= end <= len，
    /// 且 [start, end) 处的切片与 selected_text 逐字节一致。
    pub fn validate_against(&self, content: &str) -> Result<()> {
        if self.comment.trim().is_empty() {
            return Err(EssayHubError::validation("批注内容不能为空"));
        }

        if self.selected_text.is_empty() {
            if self.text_start_index != 0 || self.text_end_index != 0 {
                return Err(EssayHubError::validation("空选区的偏移必须为 (0, 0)"));
            }
            return Ok(());
        }

        if self.text_start_index < 0 || self.text_end_index < self.text_start_index {
            return Err(EssayHubError::validation("选区偏移不合法"));
        }

        let (start, end) = (self.text_start_index as usize, self.text_end_index as usize);
        if end > content.len() {
            return Err(EssayHubError::validation("选区偏移超出内容范围"));
        }

        match content.get(start..end) {
            Some(slice) if slice == self.selected_text => Ok(()),
            _ => Err(EssayHubError::validation("选区文本与内容不一致")),
        }
    }

    /// 按引用文本在内容中定位首次出现的位置并生成批注
    ///
    /// 引用文本在内容中不存在时返回 None，由调用方记录告警并丢弃。
    pub fn anchor(
        category: ReviewCategory,
        quote: &str,
        comment: impl Into<String>,
        content: &str,
    ) -> Option<Self> {
        if quote.is_empty() {
            return None;
        }
        let start = content.find(quote)?;
        Some(Self {
            category,
            selected_text: quote.to_string(),
            text_start_index: start as i32,
            text_end_index: (start + quote.len()) as i32,
            comment: comment.into(),
        })
    }
}

// 互评业务实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct PeerReview {
    pub id: i64,
    pub essay_id: i64,
    pub reviewer: Reviewer,
    pub grammar_score: i32,
    pub style_score: i32,
    pub clarity_score: i32,
    pub structure_score: i32,
    pub content_score: i32,
    pub research_score: i32,
    pub overall_score: i32,
    pub corrections: Vec<Correction>,
    pub review_comment: Option<String>,
    pub is_submitted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl crate::entity::peer_reviews::Model {
    pub fn into_peer_review(self) -> PeerReview {
        let corrections: Vec<Correction> = serde_json::from_str(&self.corrections)
            .unwrap_or_else(|e| {
                tracing::warn!("互评 {} 的批注列表解析失败: {}", self.id, e);
                Vec::new()
            });

        PeerReview {
            id: self.id,
            essay_id: self.essay_id,
            reviewer: Reviewer::from_column(self.reviewer_id),
            grammar_score: self.grammar_score,
            style_score: self.style_score,
            clarity_score: self.clarity_score,
            structure_score: self.structure_score,
            content_score: self.content_score,
            research_score: self.research_score,
            overall_score: self.overall_score,
            corrections,
            review_comment: self.review_comment,
            is_submitted: self.is_submitted,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: chrono::DateTime::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

/// 自动评审写入载荷
///
/// 由分析管线整理后交给存储层 upsert；overall_score 已按裁决折算
/// （违规内容强制为 0）。
#[derive(Debug, Clone)]
pub struct AutomatedReview {
    pub grammar_score: i32,
    pub style_score: i32,
    pub clarity_score: i32,
    pub structure_score: i32,
    pub content_score: i32,
    pub research_score: i32,
    pub overall_score: i32,
    pub corrections: Vec<Correction>,
    pub review_comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_roundtrip() {
        for s in ["grammar", "style", "clarity", "structure", "content", "research"] {
            assert_eq!(ReviewCategory::from_str(s).unwrap().to_string(), s);
        }
        assert!(ReviewCategory::from_str("spelling").is_err());
    }

    #[test]
    fn test_reviewer_column_roundtrip() {
        assert_eq!(Reviewer::from_column(Some(7)), Reviewer::Human(7));
        assert_eq!(Reviewer::from_column(None), Reviewer::Automated);
        assert_eq!(Reviewer::Human(7).to_column(), Some(7));
        assert_eq!(Reviewer::Automated.to_column(), None);
        assert!(Reviewer::Automated.is_automated());
        assert!(!Reviewer::Human(1).is_automated());
    }

    #[test]
    fn test_anchor_first_occurrence() {
        let content = "the cat sat on the mat";
        let c = Correction::anchor(ReviewCategory::Grammar, "the", "article", content).unwrap();
        assert_eq!(c.text_start_index, 0);
        assert_eq!(c.text_end_index, 3);
        assert_eq!(c.selected_text, "the");
        c.validate_against(content).unwrap();
    }

    #[test]
    fn test_anchor_missing_quote() {
        assert!(Correction::anchor(ReviewCategory::Style, "dog", "x", "the cat").is_none());
        assert!(Correction::anchor(ReviewCategory::Style, "", "x", "the cat").is_none());
    }

    #[test]
    fn test_validate_empty_selection() {
        let c = Correction {
            category: ReviewCategory::Content,
            selected_text: String::new(),
            text_start_index: 0,
            text_end_index: 0,
            comment: "overall remark".into(),
        };
        c.validate_against("anything").unwrap();

        let bad = Correction {
            text_start_index: 3,
            ..c.clone()
        };
        assert!(bad.validate_against("anything").is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_slice() {
        let c = Correction {
            category: ReviewCategory::Clarity,
            selected_text: "cat".into(),
            text_start_index: 0,
            text_end_index: 3,
            comment: "unclear".into(),
        };
        assert!(c.validate_against("the cat").is_err());
        c.validate_against("cat nap").unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_comment() {
        let c = Correction {
            category: ReviewCategory::Research,
            selected_text: String::new(),
            text_start_index: 0,
            text_end_index: 0,
            comment: "  ".into(),
        };
        assert!(c.validate_against("text").is_err());
    }

    #[test]
    fn test_validate_out_of_range() {
        let c = Correction {
            category: ReviewCategory::Structure,
            selected_text: "tail".into(),
            text_start_index: 10,
            text_end_index: 14,
            comment: "x".into(),
        };
        assert!(c.validate_against("short").is_err());
    }

    #[test]
    fn test_anchor_multibyte_content() {
        let content = "前言：the cat sat。";
        let c = Correction::anchor(ReviewCategory::Grammar, "cat", "x", content).unwrap();
        c.validate_against(content).unwrap();
    }
}
