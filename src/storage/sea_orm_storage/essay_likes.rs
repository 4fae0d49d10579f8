//! 点赞存储操作

use super::SeaOrmStorage;
use crate::entity::essay_likes::{ActiveModel, Column, Entity as EssayLikes};
use crate::errors::{EssayHubError, Result};
use crate::models::essays::entities::EssayLike;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 用户是否已点赞该随笔
    pub async fn is_essay_liked_impl(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        let count = EssayLikes::find()
            .filter(Column::EssayId.eq(essay_id))
            .filter(Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询点赞失败: {e}")))?;

        Ok(count > 0)
    }

    /// 点赞
    pub async fn create_essay_like_impl(&self, essay_id: i64, user_id: i64) -> Result<EssayLike> {
        let model = ActiveModel {
            essay_id: Set(essay_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("创建点赞失败: {e}")))?;

        Ok(result.into_essay_like())
    }

    /// 取消点赞
    pub async fn delete_essay_like_impl(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        let result = EssayLikes::delete_many()
            .filter(Column::EssayId.eq(essay_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("取消点赞失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出随笔的点赞记录
    pub async fn list_essay_likes_impl(&self, essay_id: i64) -> Result<Vec<EssayLike>> {
        let results = EssayLikes::find()
            .filter(Column::EssayId.eq(essay_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("查询点赞列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_essay_like()).collect())
    }
}
