use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建随笔表
        manager
            .create_table(
                Table::create()
                    .table(Essays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Essays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Essays::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Essays::AuthorName).string().not_null())
                    .col(ColumnDef::new(Essays::Title).text().not_null())
                    .col(ColumnDef::new(Essays::Content).text().not_null())
                    .col(
                        ColumnDef::new(Essays::WordCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Essays::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Essays::IsAnalyzed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Essays::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Essays::AverageScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Essays::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Essays::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Essays::Table, Essays::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建互评表
        // reviewer_id 为 NULL 表示 AI 评审
        manager
            .create_table(
                Table::create()
                    .table(PeerReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeerReviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::EssayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::ReviewerId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::GrammarScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::StyleScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::ClarityScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::StructureScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::ContentScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::ResearchScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::OverallScore)
                            .integer()
                            .not_null()
                            .default(600),
                    )
                    .col(ColumnDef::new(PeerReviews::Corrections).text().not_null())
                    .col(ColumnDef::new(PeerReviews::ReviewComment).text().null())
                    .col(
                        ColumnDef::new(PeerReviews::IsSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeerReviews::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PeerReviews::Table, PeerReviews::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建点赞表
        manager
            .create_table(
                Table::create()
                    .table(EssayLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EssayLikes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EssayLikes::EssayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EssayLikes::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(EssayLikes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EssayLikes::Table, EssayLikes::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EssayLikes::Table, EssayLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 互评查找走 (essay_id, reviewer_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_peer_reviews_essay_reviewer")
                    .table(PeerReviews::Table)
                    .col(PeerReviews::EssayId)
                    .col(PeerReviews::ReviewerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_essay_likes_essay_user")
                    .table(EssayLikes::Table)
                    .col(EssayLikes::EssayId)
                    .col(EssayLikes::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EssayLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PeerReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Essays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    DisplayName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Essays {
    Table,
    Id,
    AuthorId,
    AuthorName,
    Title,
    Content,
    WordCount,
    IsPublic,
    IsAnalyzed,
    ReviewCount,
    AverageScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PeerReviews {
    Table,
    Id,
    EssayId,
    ReviewerId,
    GrammarScore,
    StyleScore,
    ClarityScore,
    StructureScore,
    ContentScore,
    ResearchScore,
    OverallScore,
    Corrections,
    ReviewComment,
    IsSubmitted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EssayLikes {
    Table,
    Id,
    EssayId,
    UserId,
    CreatedAt,
}
