//! 随笔存储操作
//!
//! 删除走级联事务：互评、点赞与随笔行要么全部删除，要么全部保留。

use super::SeaOrmStorage;
use crate::entity::essay_likes::{Column as LikeColumn, Entity as EssayLikes};
use crate::entity::essays::{ActiveModel, Column, Entity as Essays};
use crate::entity::peer_reviews::{Column as ReviewColumn, Entity as PeerReviews};
use crate::errors::{EssayHubError, Result};
use crate::models::essays::{
    entities::Essay,
    requests::{CreateEssayRequest, EssayListQuery, UpdateEssayRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建随笔
    pub async fn create_essay_impl(
        &self,
        author_id: i64,
        author_name: &str,
        word_count: i32,
        req: CreateEssayRequest,
    ) -> Result<Essay> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(author_id),
            author_name: Set(author_name.to_string()),
            title: Set(req.title),
            content: Set(req.content),
            word_count: Set(word_count),
            is_public: Set(req.is_public),
            is_analyzed: Set(false),
            review_count: Set(0),
            average_score: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("创建随笔失败: {e}")))?;

        Ok(result.into_essay())
    }

    /// 通过 ID 获取随笔
    pub async fn get_essay_by_id_impl(&self, essay_id: i64) -> Result<Option<Essay>> {
        let result = Essays::find_by_id(essay_id)
            .one(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询随笔失败: {e}")))?;

        Ok(result.map(|m| m.into_essay()))
    }

    /// 列出随笔（筛选 + 搜索，最新在前）
    pub async fn list_essays_impl(
        &self,
        query: EssayListQuery,
        limit: u64,
    ) -> Result<Vec<Essay>> {
        let mut select = Essays::find();

        // 可见性筛选
        if let Some(is_public) = query.public {
            select = select.filter(Column::IsPublic.eq(is_public));
        }

        // 作者筛选
        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        // 排除某作者（发现页不展示自己的随笔）
        if let Some(exclude_author_id) = query.exclude_author_id {
            select = select.filter(Column::AuthorId.ne(exclude_author_id));
        }

        // 标题/正文子串搜索
        if let Some(ref search) = query.search
            && !search.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(search))
                    .add(Column::Content.contains(search)),
            );
        }

        let results = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询随笔列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_essay()).collect())
    }

    /// 更新随笔
    pub async fn update_essay_impl(
        &self,
        essay_id: i64,
        update: UpdateEssayRequest,
        word_count: Option<i32>,
    ) -> Result<Option<Essay>> {
        let existing = Essays::find_by_id(essay_id)
            .one(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询随笔失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(is_public) = update.is_public {
            model.is_public = Set(is_public);
        }
        if let Some(word_count) = word_count {
            model.word_count = Set(word_count);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("更新随笔失败: {e}")))?;

        Ok(Some(result.into_essay()))
    }

    /// 删除随笔（级联删除互评与点赞，单事务）
    pub async fn delete_essay_impl(&self, essay_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("开启事务失败: {e}")))?;

        PeerReviews::delete_many()
            .filter(ReviewColumn::EssayId.eq(essay_id))
            .exec(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("级联删除互评失败: {e}")))?;

        EssayLikes::delete_many()
            .filter(LikeColumn::EssayId.eq(essay_id))
            .exec(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("级联删除点赞失败: {e}")))?;

        let result = Essays::delete_by_id(essay_id)
            .exec(&txn)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("删除随笔失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EssayHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
