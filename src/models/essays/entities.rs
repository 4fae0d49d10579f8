use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 随笔业务实体
//
// review_count / average_score 是物化的聚合缓存，总与评审写入同事务刷新。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct Essay {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub word_count: i32,
    pub is_public: bool,
    pub is_analyzed: bool,
    pub review_count: i32,
    pub average_score: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl crate::entity::essays::Model {
    pub fn into_essay(self) -> Essay {
        Essay {
            id: self.id,
            author_id: self.author_id,
            author_name: self.author_name,
            title: self.title,
            content: self.content,
            word_count: self.word_count,
            is_public: self.is_public,
            is_analyzed: self.is_analyzed,
            review_count: self.review_count,
            average_score: self.average_score,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: chrono::DateTime::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

/// 审核裁决落到随笔行上的可见性补丁
///
/// 与 AI 评审 upsert、聚合刷新同事务应用。
#[derive(Debug, Clone, Copy)]
pub struct ModerationPatch {
    pub is_public: bool,
    pub is_analyzed: bool,
}

// 点赞业务实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayLike {
    pub id: i64,
    pub essay_id: i64,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl crate::entity::essay_likes::Model {
    pub fn into_essay_like(self) -> EssayLike {
        EssayLike {
            id: self.id,
            essay_id: self.essay_id,
            user_id: self.user_id,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
