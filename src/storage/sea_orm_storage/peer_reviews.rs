//! 互评存储操作
//!
//! 所有改变 overall_score 的写入都与随笔聚合缓存
//! (review_count / average_score) 的刷新在同一事务内完成；
//! 刷新失败时整个评审写入回滚。

use super::SeaOrmStorage;
use crate::entity::essays::{Column as EssayColumn, Entity as Essays};
use crate::entity::peer_reviews::{ActiveModel, Column, Entity as PeerReviews};
use crate::errors::{EssayHubError, Result};
use crate::models::essays::entities::ModerationPatch;
use crate::models::reviews::{
    entities::{AutomatedReview, Correction, PeerReview, Reviewer},
    requests::{CreateReviewRequest, UpdateReviewRequest},
};
use crate::storage::ReviewStats;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// 四舍五入的平均总分（0.5 进位；无评审时为 0）
pub(crate) fn rounded_average(sum: i64, count: i64) -> i32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i32
}

/// 按 reviewer 构造 (essay_id, reviewer_id) 查找条件
fn reviewer_filter(
    select: sea_orm::Select<PeerReviews>,
    reviewer: Reviewer,
) -> sea_orm::Select<PeerReviews> {
    match reviewer.to_column() {
        Some(id) => select.filter(Column::ReviewerId.eq(id)),
        None => select.filter(Column::ReviewerId.is_null()),
    }
}

impl SeaOrmStorage {
    /// 重算随笔的聚合缓存并写回随笔行（必须在调用方事务内执行）
    async fn refresh_essay_stats<C: ConnectionTrait>(
        conn: &C,
        essay_id: i64,
    ) -> Result<ReviewStats> {
        let scores: Vec<i32> = PeerReviews::find()
            .filter(Column::EssayId.eq(essay_id))
            .select_only()
            .column(Column::OverallScore)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询评审总分失败: {e}")))?;

        let count = scores.len() as i64;
        let sum: i64 = scores.iter().map(|s| *s as i64).sum();
        let average = rounded_average(sum, count);

        Essays::update_many()
            .col_expr(EssayColumn::ReviewCount, Expr::value(count as i32))
            .col_expr(EssayColumn::AverageScore, Expr::value(average))
            .filter(EssayColumn::Id.eq(essay_id))
            .exec(conn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("刷新聚合缓存失败: {e}")))?;

        Ok(ReviewStats { count, average })
    }

    /// 按 (essay, reviewer) 查找互评
    pub async fn get_peer_review_impl(
        &self,
        essay_id: i64,
        reviewer: Reviewer,
    ) -> Result<Option<PeerReview>> {
        let select = PeerReviews::find().filter(Column::EssayId.eq(essay_id));
        let result = reviewer_filter(select, reviewer)
            .one(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询互评失败: {e}")))?;

        Ok(result.map(|m| m.into_peer_review()))
    }

    /// 通过 ID 获取互评
    pub async fn get_peer_review_by_id_impl(&self, review_id: i64) -> Result<Option<PeerReview>> {
        let result = PeerReviews::find_by_id(review_id)
            .one(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询互评失败: {e}")))?;

        Ok(result.map(|m| m.into_peer_review()))
    }

    /// 列出随笔的全部互评（草稿、已提交与 AI 评审一视同仁）
    pub async fn list_peer_reviews_impl(&self, essay_id: i64) -> Result<Vec<PeerReview>> {
        let results = PeerReviews::find()
            .filter(Column::EssayId.eq(essay_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询互评列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_peer_review()).collect())
    }

    /// 创建互评（同事务刷新聚合缓存）
    pub async fn create_peer_review_impl(
        &self,
        essay_id: i64,
        reviewer: Reviewer,
        req: CreateReviewRequest,
    ) -> Result<PeerReview> {
        let now = chrono::Utc::now().timestamp();

        // 未打分的类别取中性默认值 100
        let grammar = req.grammar_score.unwrap_or(100);
        let style = req.style_score.unwrap_or(100);
        let clarity = req.clarity_score.unwrap_or(100);
        let structure = req.structure_score.unwrap_or(100);
        let content = req.content_score.unwrap_or(100);
        let research = req.research_score.unwrap_or(100);
        let overall = grammar + style + clarity + structure + content + research;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            essay_id: Set(essay_id),
            reviewer_id: Set(reviewer.to_column()),
            grammar_score: Set(grammar),
            style_score: Set(style),
            clarity_score: Set(clarity),
            structure_score: Set(structure),
            content_score: Set(content),
            research_score: Set(research),
            overall_score: Set(overall),
            corrections: Set("[]".to_string()),
            review_comment: Set(req.review_comment),
            is_submitted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("创建互评失败: {e}")))?;

        Self::refresh_essay_stats(&txn, essay_id).await?;

        txn.commit()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_peer_review())
    }

    /// 更新互评分数/提交状态（同事务刷新聚合缓存）
    ///
    /// overall_score 始终由更新后的六项分数重新求和得出。
    /// 提交锁在事务内以当前行状态复核，服务层的预检不作数：
    /// 并发提交与并发编辑交错时，后到的写入在此被拒绝。
    pub async fn update_peer_review_impl(
        &self,
        review_id: i64,
        update: UpdateReviewRequest,
    ) -> Result<Option<PeerReview>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = PeerReviews::find_by_id(review_id)
            .one(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询互评失败: {e}")))?;

        let Some(existing) = existing else {
            txn.rollback()
                .await
                .map_err(|e| EssayHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        };

        if existing.is_submitted {
            txn.rollback()
                .await
                .map_err(|e| EssayHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(EssayHubError::review_already_submitted(
                "互评已提交，不可再修改",
            ));
        }

        let essay_id = existing.essay_id;

        let grammar = update.grammar_score.unwrap_or(existing.grammar_score);
        let style = update.style_score.unwrap_or(existing.style_score);
        let clarity = update.clarity_score.unwrap_or(existing.clarity_score);
        let structure = update.structure_score.unwrap_or(existing.structure_score);
        let content = update.content_score.unwrap_or(existing.content_score);
        let research = update.research_score.unwrap_or(existing.research_score);

        let mut model: ActiveModel = existing.into();
        model.grammar_score = Set(grammar);
        model.style_score = Set(style);
        model.clarity_score = Set(clarity);
        model.structure_score = Set(structure);
        model.content_score = Set(content);
        model.research_score = Set(research);
        model.overall_score = Set(grammar + style + clarity + structure + content + research);
        if let Some(comment) = update.review_comment {
            model.review_comment = Set(Some(comment));
        }
        if let Some(is_submitted) = update.is_submitted {
            model.is_submitted = Set(is_submitted);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("更新互评失败: {e}")))?;

        Self::refresh_essay_stats(&txn, essay_id).await?;

        txn.commit()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_peer_review()))
    }

    /// 追加批注（读改写走事务，避免并发追加互相覆盖）
    ///
    /// 提交锁同样在事务内复核，见 update_peer_review_impl。
    pub async fn append_correction_impl(
        &self,
        review_id: i64,
        correction: Correction,
    ) -> Result<Option<PeerReview>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = PeerReviews::find_by_id(review_id)
            .one(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询互评失败: {e}")))?;

        let Some(existing) = existing else {
            txn.rollback()
                .await
                .map_err(|e| EssayHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        };

        if existing.is_submitted {
            txn.rollback()
                .await
                .map_err(|e| EssayHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(EssayHubError::review_already_submitted(
                "互评已提交，不可再追加批注",
            ));
        }

        let mut corrections: Vec<Correction> =
            serde_json::from_str(&existing.corrections).unwrap_or_default();
        corrections.push(correction);
        let serialized = serde_json::to_string(&corrections)?;

        let mut model: ActiveModel = existing.into();
        model.corrections = Set(serialized);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("追加批注失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_peer_review()))
    }

    /// upsert AI 评审并应用审核补丁（单事务）
    ///
    /// 每篇随笔至多一条 AI 评审：存在则原地更新分数/批注/评语，
    /// 不存在则创建；随笔可见性补丁与聚合刷新在同一事务内落库。
    pub async fn upsert_ai_review_impl(
        &self,
        essay_id: i64,
        review: AutomatedReview,
        patch: ModerationPatch,
    ) -> Result<PeerReview> {
        let now = chrono::Utc::now().timestamp();
        let serialized = serde_json::to_string(&review.corrections)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = PeerReviews::find()
            .filter(Column::EssayId.eq(essay_id))
            .filter(Column::ReviewerId.is_null())
            .one(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询 AI 评审失败: {e}")))?;

        let result = match existing {
            Some(existing) => {
                let mut model: ActiveModel = existing.into();
                model.grammar_score = Set(review.grammar_score);
                model.style_score = Set(review.style_score);
                model.clarity_score = Set(review.clarity_score);
                model.structure_score = Set(review.structure_score);
                model.content_score = Set(review.content_score);
                model.research_score = Set(review.research_score);
                model.overall_score = Set(review.overall_score);
                model.corrections = Set(serialized);
                model.review_comment = Set(Some(review.review_comment));
                model.is_submitted = Set(true);
                model.updated_at = Set(now);

                model.update(&txn).await.map_err(|e| {
                    EssayHubError::database_operation(format!("更新 AI 评审失败: {e}"))
                })?
            }
            None => {
                let model = ActiveModel {
                    essay_id: Set(essay_id),
                    reviewer_id: Set(None),
                    grammar_score: Set(review.grammar_score),
                    style_score: Set(review.style_score),
                    clarity_score: Set(review.clarity_score),
                    structure_score: Set(review.structure_score),
                    content_score: Set(review.content_score),
                    research_score: Set(review.research_score),
                    overall_score: Set(review.overall_score),
                    corrections: Set(serialized),
                    review_comment: Set(Some(review.review_comment)),
                    is_submitted: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };

                model.insert(&txn).await.map_err(|e| {
                    EssayHubError::database_operation(format!("创建 AI 评审失败: {e}"))
                })?
            }
        };

        // 审核裁决落到随笔行
        Essays::update_many()
            .col_expr(EssayColumn::IsPublic, Expr::value(patch.is_public))
            .col_expr(EssayColumn::IsAnalyzed, Expr::value(patch.is_analyzed))
            .col_expr(EssayColumn::UpdatedAt, Expr::value(now))
            .filter(EssayColumn::Id.eq(essay_id))
            .exec(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("应用审核补丁失败: {e}")))?;

        Self::refresh_essay_stats(&txn, essay_id).await?;

        txn.commit()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_peer_review())
    }

    /// 聚合统计（不落库，只读）
    pub async fn review_stats_impl(&self, essay_id: i64) -> Result<ReviewStats> {
        let scores: Vec<i32> = PeerReviews::find()
            .filter(Column::EssayId.eq(essay_id))
            .select_only()
            .column(Column::OverallScore)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询评审总分失败: {e}")))?;

        let count = scores.len() as i64;
        let sum: i64 = scores.iter().map(|s| *s as i64).sum();

        Ok(ReviewStats {
            count,
            average: rounded_average(sum, count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::rounded_average;
    use crate::errors::EssayHubError;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::models::reviews::{
        entities::{Correction, ReviewCategory, Reviewer},
        requests::{CreateReviewRequest, UpdateReviewRequest},
    };

    #[test]
    fn test_rounded_average_empty() {
        assert_eq!(rounded_average(0, 0), 0);
    }

    #[test]
    fn test_rounded_average_exact() {
        assert_eq!(rounded_average(1200, 2), 600);
    }

    #[test]
    fn test_rounded_average_half_up() {
        // 1201 / 2 = 600.5 -> 601
        assert_eq!(rounded_average(1201, 2), 601);
        // 1999 / 3 = 666.33 -> 666
        assert_eq!(rounded_average(1999, 3), 666);
        // 2000 / 3 = 666.67 -> 667
        assert_eq!(rounded_average(2000, 3), 667);
    }

    #[tokio::test]
    async fn test_review_stats_matches_materialized_cache() {
        let storage = SeaOrmStorage::new_with_url("sqlite::memory:")
            .await
            .expect("in-memory storage");
        for name in ["author", "reviewer", "reviewer2"] {
            storage.create_user_impl(name, None).await.unwrap();
        }
        let essay = storage
            .create_essay_impl(
                1,
                "author",
                1,
                CreateEssayRequest {
                    title: "t".into(),
                    content: "c".into(),
                    is_public: true,
                },
            )
            .await
            .unwrap();

        let stats = storage.review_stats_impl(essay.id).await.unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, 0);

        let blank = CreateReviewRequest {
            grammar_score: None,
            style_score: None,
            clarity_score: None,
            structure_score: None,
            content_score: None,
            research_score: None,
            review_comment: None,
        };
        storage
            .create_peer_review_impl(essay.id, Reviewer::Human(2), blank.clone())
            .await
            .unwrap();
        storage
            .create_peer_review_impl(
                essay.id,
                Reviewer::Human(3),
                CreateReviewRequest {
                    grammar_score: Some(101),
                    ..blank
                },
            )
            .await
            .unwrap();

        let stats = storage.review_stats_impl(essay.id).await.unwrap();
        let essay = storage.get_essay_by_id_impl(essay.id).await.unwrap().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, 601);
        assert_eq!(essay.review_count, stats.count as i32);
        assert_eq!(essay.average_score, stats.average);
    }

    async fn setup_submitted_review() -> (SeaOrmStorage, i64) {
        let storage = SeaOrmStorage::new_with_url("sqlite::memory:")
            .await
            .expect("in-memory storage");
        for name in ["author", "reviewer"] {
            storage.create_user_impl(name, None).await.unwrap();
        }
        let essay = storage
            .create_essay_impl(
                1,
                "author",
                1,
                CreateEssayRequest {
                    title: "t".into(),
                    content: "the cat".into(),
                    is_public: true,
                },
            )
            .await
            .unwrap();
        let review = storage
            .create_peer_review_impl(essay.id, Reviewer::Human(2), CreateReviewRequest {
                grammar_score: None,
                style_score: None,
                clarity_score: None,
                structure_score: None,
                content_score: None,
                research_score: None,
                review_comment: None,
            })
            .await
            .unwrap();
        storage
            .update_peer_review_impl(review.id, UpdateReviewRequest {
                is_submitted: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        (storage, review.id)
    }

    #[tokio::test]
    async fn test_update_rechecks_submitted_lock_in_transaction() {
        // 模拟服务层预检与写入之间被并发提交插入的交错：
        // 即使调用方基于过期读数绕过了预检，事务内的复核也要拒绝写入
        let (storage, review_id) = setup_submitted_review().await;

        let err = storage
            .update_peer_review_impl(review_id, UpdateReviewRequest {
                grammar_score: Some(0),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ReviewAlreadySubmitted(_)));

        let review = storage
            .get_peer_review_by_id_impl(review_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(review.grammar_score, 100);
        assert!(review.is_submitted);
    }

    #[tokio::test]
    async fn test_append_correction_rechecks_submitted_lock() {
        let (storage, review_id) = setup_submitted_review().await;

        let err = storage
            .append_correction_impl(
                review_id,
                Correction {
                    category: ReviewCategory::Grammar,
                    selected_text: "cat".into(),
                    text_start_index: 4,
                    text_end_index: 7,
                    comment: "late".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ReviewAlreadySubmitted(_)));

        let review = storage
            .get_peer_review_by_id_impl(review_id)
            .await
            .unwrap()
            .unwrap();
        assert!(review.corrections.is_empty());
    }
}
