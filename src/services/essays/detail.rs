use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EssayService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::essays::entities::Essay;
use crate::services::error_response;
use crate::storage::Storage;

/// 可见性门禁：公开随笔或本人随笔可读，其余一律拒绝
pub(crate) async fn try_get_essay(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<Essay> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if !essay.is_public && essay.author_id != user_id {
        return Err(EssayHubError::forbidden_access("没有查看该随笔的权限"));
    }

    Ok(essay)
}

/// 获取随笔详情
/// GET /essays/{id}
pub async fn get_essay(
    service: &EssayService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_get_essay(&storage, essay_id, user_id).await {
        Ok(essay) => Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup() -> Arc<dyn Storage> {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        );
        storage.create_user("author", None).await.unwrap();
        storage
    }

    async fn seed_essay(storage: &Arc<dyn Storage>, author_id: i64, is_public: bool) -> i64 {
        storage
            .create_essay(
                author_id,
                "author",
                2,
                CreateEssayRequest {
                    title: "t".into(),
                    content: "a b".into(),
                    is_public,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_public_essay_visible_to_anyone() {
        let storage = setup().await;
        let id = seed_essay(&storage, 1, true).await;

        try_get_essay(&storage, id, 99).await.unwrap();
    }

    #[tokio::test]
    async fn test_private_essay_visible_to_author_only() {
        let storage = setup().await;
        let id = seed_essay(&storage, 1, false).await;

        try_get_essay(&storage, id, 1).await.unwrap();

        let err = try_get_essay(&storage, id, 2).await.unwrap_err();
        assert!(matches!(err, EssayHubError::ForbiddenAccess(_)));
    }

    #[tokio::test]
    async fn test_missing_essay() {
        let storage = setup().await;
        let err = try_get_essay(&storage, 404, 1).await.unwrap_err();
        assert!(matches!(err, EssayHubError::EssayNotFound(_)));
    }
}
