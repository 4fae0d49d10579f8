use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EssayService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::essays::responses::LikeToggleResponse;
use crate::services::error_response;
use crate::storage::Storage;

/// 切换点赞
///
/// 只能点赞公开的、他人的随笔；重复调用在点赞/取消之间切换。
pub(crate) async fn try_toggle_like(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<LikeToggleResponse> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if essay.author_id == user_id {
        return Err(EssayHubError::cannot_like_own_essay("不能点赞自己的随笔"));
    }
    if !essay.is_public {
        return Err(EssayHubError::forbidden_access("只能点赞公开随笔"));
    }

    let liked = if storage.is_essay_liked(essay_id, user_id).await? {
        storage.delete_essay_like(essay_id, user_id).await?;
        false
    } else {
        storage.create_essay_like(essay_id, user_id).await?;
        true
    };

    Ok(LikeToggleResponse { liked })
}

/// 切换点赞
/// POST /essays/{id}/like
pub async fn toggle_like(
    service: &EssayService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_toggle_like(&storage, essay_id, user_id).await {
        Ok(result) => {
            let message = if result.liked {
                "点赞成功"
            } else {
                "已取消点赞"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup_with_essay(is_public: bool) -> (Arc<dyn Storage>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        );
        for name in ["author", "reader"] {
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
                    is_public,
                },
            )
            .await
            .unwrap();
        (storage, essay.id)
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let (storage, id) = setup_with_essay(true).await;

        let first = try_toggle_like(&storage, id, 2).await.unwrap();
        assert!(first.liked);
        assert!(storage.is_essay_liked(id, 2).await.unwrap());

        let second = try_toggle_like(&storage, id, 2).await.unwrap();
        assert!(!second.liked);
        assert!(!storage.is_essay_liked(id, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_cannot_like_own_essay() {
        let (storage, id) = setup_with_essay(true).await;

        let err = try_toggle_like(&storage, id, 1).await.unwrap_err();
        assert!(matches!(err, EssayHubError::CannotLikeOwnEssay(_)));
    }

    #[tokio::test]
    async fn test_cannot_like_private_essay() {
        let (storage, id) = setup_with_essay(false).await;

        let err = try_toggle_like(&storage, id, 2).await.unwrap_err();
        assert!(matches!(err, EssayHubError::ForbiddenAccess(_)));
    }
}
