use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use super::EssayService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::essays::{entities::Essay, requests::CreateEssayRequest};
use crate::models::users::entities::User;
use crate::services::{analysis, error_response};
use crate::storage::Storage;
use crate::utils::word_count;

/// 创建随笔
pub(crate) async fn try_create_essay(
    storage: &Arc<dyn Storage>,
    user: &User,
    req: CreateEssayRequest,
) -> Result<Essay> {
    if req.title.trim().is_empty() {
        return Err(EssayHubError::validation("标题不能为空"));
    }
    if req.content.trim().is_empty() {
        return Err(EssayHubError::validation("内容不能为空"));
    }

    let author_name = user
        .display_name
        .clone()
        .unwrap_or_else(|| user.username.clone());
    let words = word_count(&req.content);

    storage
        .create_essay(user.id, &author_name, words, req)
        .await
}

/// 创建随笔
/// POST /essays
pub async fn create_essay(
    service: &EssayService,
    request: &HttpRequest,
    user: User,
    req: CreateEssayRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_create_essay(&storage, &user, req).await {
        Ok(essay) => {
            // 公开随笔在后台触发内容分析，不阻塞创建响应
            if essay.is_public {
                let storage = storage.clone();
                let essay_id = essay.id;
                tokio::spawn(async move {
                    if let Err(e) = analysis::pipeline::analyze_essay(&storage, essay_id).await {
                        warn!("随笔 {} 的后台分析失败: {}", essay_id, e);
                    }
                });
            }

            Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "创建成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup() -> (Arc<dyn Storage>, User) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        );
        let user = storage
            .create_user("alice", Some("Alice".to_string()))
            .await
            .unwrap();
        (storage, user)
    }

    #[tokio::test]
    async fn test_create_essay_counts_words_and_resolves_author() {
        let (storage, user) = setup().await;

        let essay = try_create_essay(
            &storage,
            &user,
            CreateEssayRequest {
                title: "On cats".into(),
                content: "the cat sat on the mat".into(),
                is_public: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(essay.word_count, 6);
        assert_eq!(essay.author_name, "Alice");
        assert_eq!(essay.author_id, user.id);
        assert!(essay.is_public);
        assert!(!essay.is_analyzed);
        assert_eq!(essay.review_count, 0);
        assert_eq!(essay.average_score, 0);
    }

    #[tokio::test]
    async fn test_create_essay_falls_back_to_username() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .unwrap(),
        );
        let user = storage.create_user("bob", None).await.unwrap();

        let essay = try_create_essay(
            &storage,
            &user,
            CreateEssayRequest {
                title: "t".into(),
                content: "c".into(),
                is_public: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(essay.author_name, "bob");
    }

    #[tokio::test]
    async fn test_create_essay_rejects_blank_fields() {
        let (storage, user) = setup().await;

        let err = try_create_essay(
            &storage,
            &user,
            CreateEssayRequest {
                title: "  ".into(),
                content: "c".into(),
                is_public: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));

        let err = try_create_essay(
            &storage,
            &user,
            CreateEssayRequest {
                title: "t".into(),
                content: "".into(),
                is_public: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));
    }
}
