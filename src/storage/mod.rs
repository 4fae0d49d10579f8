use std::sync::Arc;

use crate::models::{
    essays::{
        entities::{Essay, EssayLike, ModerationPatch},
        requests::{CreateEssayRequest, EssayListQuery, UpdateEssayRequest},
    },
    reviews::{
        entities::{AutomatedReview, Correction, PeerReview, Reviewer},
        requests::{CreateReviewRequest, UpdateReviewRequest},
    },
    users::entities::User,
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 评审集合的聚合统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStats {
    pub count: i64,
    pub average: i32,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户方法（仅作者名解析所需）
    // 创建用户
    async fn create_user(&self, username: &str, display_name: Option<String>) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 随笔方法
    // 创建随笔
    async fn create_essay(
        &self,
        author_id: i64,
        author_name: &str,
        word_count: i32,
        essay: CreateEssayRequest,
    ) -> Result<Essay>;
    // 通过ID获取随笔
    async fn get_essay_by_id(&self, essay_id: i64) -> Result<Option<Essay>>;
    // 列出随笔（筛选 + 搜索，最新在前）
    async fn list_essays(&self, query: EssayListQuery, limit: u64) -> Result<Vec<Essay>>;
    // 更新随笔（word_count 由调用方在内容变更时重算）
    async fn update_essay(
        &self,
        essay_id: i64,
        update: UpdateEssayRequest,
        word_count: Option<i32>,
    ) -> Result<Option<Essay>>;
    // 删除随笔，并在同一事务内级联删除其互评与点赞
    async fn delete_essay(&self, essay_id: i64) -> Result<bool>;

    /// 互评方法
    // 按 (essay, reviewer) 查找互评
    async fn get_peer_review(&self, essay_id: i64, reviewer: Reviewer)
    -> Result<Option<PeerReview>>;
    // 通过ID获取互评
    async fn get_peer_review_by_id(&self, review_id: i64) -> Result<Option<PeerReview>>;
    // 列出随笔的全部互评（含草稿与 AI 评审）
    async fn list_peer_reviews(&self, essay_id: i64) -> Result<Vec<PeerReview>>;
    // 创建互评（同事务刷新随笔聚合缓存）
    async fn create_peer_review(
        &self,
        essay_id: i64,
        reviewer: Reviewer,
        review: CreateReviewRequest,
    ) -> Result<PeerReview>;
    // 更新互评分数/提交状态（同事务刷新随笔聚合缓存；
    // 目标行已提交时返回 ReviewAlreadySubmitted）
    async fn update_peer_review(
        &self,
        review_id: i64,
        update: UpdateReviewRequest,
    ) -> Result<Option<PeerReview>>;
    // 追加批注（追加式，不回写整表；目标行已提交时同样拒绝）
    async fn append_correction(
        &self,
        review_id: i64,
        correction: Correction,
    ) -> Result<Option<PeerReview>>;
    // upsert AI 评审并应用审核补丁（单事务）
    async fn upsert_ai_review(
        &self,
        essay_id: i64,
        review: AutomatedReview,
        patch: ModerationPatch,
    ) -> Result<PeerReview>;
    // 聚合统计（count 与四舍五入的平均总分）
    async fn review_stats(&self, essay_id: i64) -> Result<ReviewStats>;

    /// 点赞方法
    // 是否已点赞
    async fn is_essay_liked(&self, essay_id: i64, user_id: i64) -> Result<bool>;
    // 点赞
    async fn create_essay_like(&self, essay_id: i64, user_id: i64) -> Result<EssayLike>;
    // 取消点赞
    async fn delete_essay_like(&self, essay_id: i64, user_id: i64) -> Result<bool>;
    // 列出随笔的点赞
    async fn list_essay_likes(&self, essay_id: i64) -> Result<Vec<EssayLike>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
