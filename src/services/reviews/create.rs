use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ReviewService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::reviews::{
    entities::Reviewer,
    requests::CreateReviewRequest,
    responses::ReviewCreateResponse,
};
use crate::services::error_response;
use crate::storage::Storage;

/// 创建互评
///
/// 同一 (essay, reviewer) 已有互评时幂等返回现有记录（`is_new = false`），
/// 不覆盖任何已填写的分数。不能评审自己的随笔。
pub(crate) async fn try_create_review(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
    req: CreateReviewRequest,
) -> Result<ReviewCreateResponse> {
    super::check_score_range([
        req.grammar_score,
        req.style_score,
        req.clarity_score,
        req.structure_score,
        req.content_score,
        req.research_score,
    ])?;

    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if essay.author_id == user_id {
        return Err(EssayHubError::cannot_review_own_essay(
            "不能评审自己的随笔",
        ));
    }

    let reviewer = Reviewer::Human(user_id);
    if let Some(existing) = storage.get_peer_review(essay_id, reviewer).await? {
        return Ok(ReviewCreateResponse {
            review: existing,
            is_new: false,
        });
    }

    let review = storage.create_peer_review(essay_id, reviewer, req).await?;
    Ok(ReviewCreateResponse {
        review,
        is_new: true,
    })
}

/// 创建互评
/// POST /essays/{id}/reviews
pub async fn create_review(
    service: &ReviewService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
    req: CreateReviewRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_create_review(&storage, essay_id, user_id, req).await {
        Ok(result) => {
            let message = if result.is_new {
                "创建成功"
            } else {
                "互评已存在"
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

    fn blank_request() -> CreateReviewRequest {
        CreateReviewRequest {
            grammar_score: None,
            style_score: None,
            clarity_score: None,
            structure_score: None,
            content_score: None,
            research_score: None,
            review_comment: None,
        }
    }

    async fn setup_with_essay() -> (Arc<dyn Storage>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_with_url("sqlite::memory:")
                .await
                .expect("in-memory storage"),
        );
        for name in ["author", "reviewer", "reviewer2"] {
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
    async fn test_create_defaults_and_aggregate_refresh() {
        let (storage, essay_id) = setup_with_essay().await;

        let result = try_create_review(&storage, essay_id, 2, blank_request())
            .await
            .unwrap();
        assert!(result.is_new);
        assert_eq!(result.review.grammar_score, 100);
        assert_eq!(result.review.overall_score, 600);
        assert!(!result.review.is_submitted);
        assert_eq!(result.review.reviewer, Reviewer::Human(2));

        let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
        assert_eq!(essay.review_count, 1);
        assert_eq!(essay.average_score, 600);
    }

    #[tokio::test]
    async fn test_recreate_is_idempotent() {
        let (storage, essay_id) = setup_with_essay().await;

        let first = try_create_review(
            &storage,
            essay_id,
            2,
            CreateReviewRequest {
                grammar_score: Some(150),
                ..blank_request()
            },
        )
        .await
        .unwrap();
        assert!(first.is_new);

        // 再次创建：返回现有记录，分数不被覆盖
        let second = try_create_review(&storage, essay_id, 2, blank_request())
            .await
            .unwrap();
        assert!(!second.is_new);
        assert_eq!(second.review.id, first.review.id);
        assert_eq!(second.review.grammar_score, 150);

        let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
        assert_eq!(essay.review_count, 1);
    }

    #[tokio::test]
    async fn test_cannot_review_own_essay() {
        let (storage, essay_id) = setup_with_essay().await;

        let err = try_create_review(&storage, essay_id, 1, blank_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::CannotReviewOwnEssay(_)));
    }

    #[tokio::test]
    async fn test_missing_essay() {
        let (storage, _) = setup_with_essay().await;

        let err = try_create_review(&storage, 404, 2, blank_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::EssayNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_scores() {
        let (storage, essay_id) = setup_with_essay().await;

        // 创建与更新走同一道分数门禁，越界分数不得进入聚合
        let err = try_create_review(
            &storage,
            essay_id,
            2,
            CreateReviewRequest {
                grammar_score: Some(100000),
                ..blank_request()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));

        let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
        assert_eq!(essay.review_count, 0);
        assert_eq!(essay.average_score, 0);
    }

    #[tokio::test]
    async fn test_average_rounds_half_up() {
        let (storage, essay_id) = setup_with_essay().await;

        try_create_review(
            &storage,
            essay_id,
            2,
            CreateReviewRequest {
                grammar_score: Some(100),
                ..blank_request()
            },
        )
        .await
        .unwrap();
        try_create_review(
            &storage,
            essay_id,
            3,
            CreateReviewRequest {
                grammar_score: Some(101),
                ..blank_request()
            },
        )
        .await
        .unwrap();

        // (600 + 601) / 2 = 600.5 -> 601
        let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
        assert_eq!(essay.review_count, 2);
        assert_eq!(essay.average_score, 601);
    }
}
