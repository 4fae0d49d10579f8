//! 用户实体
//!
//! 认证与资料管理不属于本服务，这里只保留随笔作者名解析所需的最小字段。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::essays::Entity")]
    Essays,
    #[sea_orm(has_many = "super::essay_likes::Entity")]
    EssayLikes,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essays.def()
    }
}

impl Related<super::essay_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EssayLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
