use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EssayService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::services::error_response;
use crate::storage::Storage;

/// 删除随笔（仅作者；互评与点赞级联删除）
pub(crate) async fn try_delete_essay(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<()> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if essay.author_id != user_id {
        return Err(EssayHubError::forbidden_access("只有作者可以删除随笔"));
    }

    if !storage.delete_essay(essay_id).await? {
        return Err(EssayHubError::essay_not_found("随笔不存在"));
    }

    Ok(())
}

/// 删除随笔
/// DELETE /essays/{id}
pub async fn delete_essay(
    service: &EssayService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_delete_essay(&storage, essay_id, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("删除成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::models::reviews::{entities::Reviewer, requests::CreateReviewRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup_with_essay() -> (Arc<dyn Storage>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        );
        for name in ["author", "reviewer"] {
            storage.create_user(name, None).await.unwrap();
        }
        let essay = storage
            .create_essay(
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
        (storage, essay.id)
    }

    #[tokio::test]
    async fn test_delete_cascades_reviews_and_likes() {
        let (storage, id) = setup_with_essay().await;

        storage
            .create_peer_review(id, Reviewer::Human(2), CreateReviewRequest {
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
        storage.create_essay_like(id, 2).await.unwrap();

        try_delete_essay(&storage, id, 1).await.unwrap();

        assert!(storage.get_essay_by_id(id).await.unwrap().is_none());
        assert!(storage.list_peer_reviews(id).await.unwrap().is_empty());
        assert!(storage.list_essay_likes(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_author_can_delete() {
        let (storage, id) = setup_with_essay().await;

        let err = try_delete_essay(&storage, id, 99).await.unwrap_err();
        assert!(matches!(err, EssayHubError::ForbiddenAccess(_)));
        assert!(storage.get_essay_by_id(id).await.unwrap().is_some());
    }
}
