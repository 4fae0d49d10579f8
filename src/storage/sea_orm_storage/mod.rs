//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 涉及评审分数或随笔聚合缓存的多步写入一律走数据库事务。

mod essay_likes;
mod essays;
mod peer_reviews;
mod users;

use crate::config::AppConfig;
use crate::errors::{EssayHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例（使用全局配置）
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::new_with_url(&config.database.url).await
    }

    /// 按给定 URL 创建存储实例并运行迁移
    ///
    /// 测试使用 `sqlite::memory:` 走这条路径。
    pub async fn new_with_url(url: &str) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url).await?
        } else {
            Self::connect_generic(&db_url).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EssayHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let config = AppConfig::get();

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EssayHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库的每个连接都是独立实例，必须收敛到单连接
        let pool_size = if url.contains(":memory:") {
            1
        } else {
            config.database.pool_size
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EssayHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str) -> Result<DatabaseConnection> {
        let config = AppConfig::get();

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EssayHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url == "sqlite::memory:" || url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EssayHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::{ReviewStats, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, username: &str, display_name: Option<String>) -> Result<User> {
        self.create_user_impl(username, display_name).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 随笔模块
    async fn create_essay(
        &self,
        author_id: i64,
        author_name: &str,
        word_count: i32,
        essay: CreateEssayRequest,
    ) -> Result<Essay> {
        self.create_essay_impl(author_id, author_name, word_count, essay)
            .await
    }

    async fn get_essay_by_id(&self, essay_id: i64) -> Result<Option<Essay>> {
        self.get_essay_by_id_impl(essay_id).await
    }

    async fn list_essays(&self, query: EssayListQuery, limit: u64) -> Result<Vec<Essay>> {
        self.list_essays_impl(query, limit).await
    }

    async fn update_essay(
        &self,
        essay_id: i64,
        update: UpdateEssayRequest,
        word_count: Option<i32>,
    ) -> Result<Option<Essay>> {
        self.update_essay_impl(essay_id, update, word_count).await
    }

    async fn delete_essay(&self, essay_id: i64) -> Result<bool> {
        self.delete_essay_impl(essay_id).await
    }

    // 互评模块
    async fn get_peer_review(
        &self,
        essay_id: i64,
        reviewer: Reviewer,
    ) -> Result<Option<PeerReview>> {
        self.get_peer_review_impl(essay_id, reviewer).await
    }

    async fn get_peer_review_by_id(&self, review_id: i64) -> Result<Option<PeerReview>> {
        self.get_peer_review_by_id_impl(review_id).await
    }

    async fn list_peer_reviews(&self, essay_id: i64) -> Result<Vec<PeerReview>> {
        self.list_peer_reviews_impl(essay_id).await
    }

    async fn create_peer_review(
        &self,
        essay_id: i64,
        reviewer: Reviewer,
        review: CreateReviewRequest,
    ) -> Result<PeerReview> {
        self.create_peer_review_impl(essay_id, reviewer, review)
            .await
    }

    async fn update_peer_review(
        &self,
        review_id: i64,
        update: UpdateReviewRequest,
    ) -> Result<Option<PeerReview>> {
        self.update_peer_review_impl(review_id, update).await
    }

    async fn append_correction(
        &self,
        review_id: i64,
        correction: Correction,
    ) -> Result<Option<PeerReview>> {
        self.append_correction_impl(review_id, correction).await
    }

    async fn upsert_ai_review(
        &self,
        essay_id: i64,
        review: AutomatedReview,
        patch: ModerationPatch,
    ) -> Result<PeerReview> {
        self.upsert_ai_review_impl(essay_id, review, patch).await
    }

    async fn review_stats(&self, essay_id: i64) -> Result<ReviewStats> {
        self.review_stats_impl(essay_id).await
    }

    // 点赞模块
    async fn is_essay_liked(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        self.is_essay_liked_impl(essay_id, user_id).await
    }

    async fn create_essay_like(&self, essay_id: i64, user_id: i64) -> Result<EssayLike> {
        self.create_essay_like_impl(essay_id, user_id).await
    }

    async fn delete_essay_like(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        self.delete_essay_like_impl(essay_id, user_id).await
    }

    async fn list_essay_likes(&self, essay_id: i64) -> Result<Vec<EssayLike>> {
        self.list_essay_likes_impl(essay_id).await
    }
}
