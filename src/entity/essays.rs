//! 随笔实体
//!
//! `review_count` 与 `average_score` 是按评审集合物化的聚合缓存，
//! 只允许与触发它的评审写入在同一事务内更新。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "essays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub word_count: i32,
    pub is_public: bool,
    pub is_analyzed: bool,
    pub review_count: i32,
    pub average_score: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::peer_reviews::Entity")]
    PeerReviews,
    #[sea_orm(has_many = "super::essay_likes::Entity")]
    EssayLikes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::peer_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeerReviews.def()
    }
}

impl Related<super::essay_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EssayLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
