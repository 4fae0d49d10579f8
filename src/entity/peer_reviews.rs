//! 互评实体
//!
//! `reviewer_id` 为 NULL 表示自动评审（AI）；每个 (essay_id, reviewer_id)
//! 组合至多存在一行，由创建前查找保证。`corrections` 以 JSON 文本存储。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "peer_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub essay_id: i64,
    pub reviewer_id: Option<i64>,
    pub grammar_score: i32,
    pub style_score: i32,
    pub clarity_score: i32,
    pub structure_score: i32,
    pub content_score: i32,
    pub research_score: i32,
    pub overall_score: i32,
    #[sea_orm(column_type = "Text")]
    pub corrections: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,
    pub is_submitted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::essays::Entity",
        from = "Column::EssayId",
        to = "super::essays::Column::Id"
    )]
    Essay,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewerId",
        to = "super::users::Column::Id"
    )]
    Reviewer,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essay.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
