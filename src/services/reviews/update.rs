use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ReviewService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::reviews::{
    entities::{PeerReview, Reviewer},
    requests::UpdateReviewRequest,
};
use crate::services::error_response;
use crate::storage::Storage;

/// 更新互评 / 提交
///
/// 只有评审者本人可以操作；已提交的互评拒绝一切修改
/// （不存在静默重开）。
pub(crate) async fn try_update_review(
    storage: &Arc<dyn Storage>,
    review_id: i64,
    user_id: i64,
    update: UpdateReviewRequest,
) -> Result<PeerReview> {
    super::check_score_range([
        update.grammar_score,
        update.style_score,
        update.clarity_score,
        update.structure_score,
        update.content_score,
        update.research_score,
    ])?;

    let review = storage
        .get_peer_review_by_id(review_id)
        .await?
        .ok_or_else(|| EssayHubError::review_not_found("互评不存在"))?;

    if review.reviewer != Reviewer::Human(user_id) {
        return Err(EssayHubError::forbidden_access("只有评审者本人可以修改互评"));
    }

    if review.is_submitted {
        return Err(EssayHubError::review_already_submitted(
            "互评已提交，不可再修改",
        ));
    }

    storage
        .update_peer_review(review_id, update)
        .await?
        .ok_or_else(|| EssayHubError::review_not_found("互评不存在"))
}

/// 更新互评
/// PATCH /reviews/{id}
pub async fn update_review(
    service: &ReviewService,
    request: &HttpRequest,
    review_id: i64,
    user_id: i64,
    req: UpdateReviewRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_update_review(&storage, review_id, user_id, req).await {
        Ok(review) => {
            let message = if review.is_submitted {
                "互评已提交"
            } else {
                "更新成功"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(review, message)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::models::reviews::requests::CreateReviewRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup_with_review() -> (Arc<dyn Storage>, i64, i64) {
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
        let review = storage
            .create_peer_review(essay.id, Reviewer::Human(2), CreateReviewRequest {
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
        (storage, essay.id, review.id)
    }

    #[tokio::test]
    async fn test_update_recomputes_overall_and_aggregate() {
        let (storage, essay_id, review_id) = setup_with_review().await;

        let review = try_update_review(
            &storage,
            review_id,
            2,
            UpdateReviewRequest {
                grammar_score: Some(200),
                style_score: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // 200 + 0 + 100 * 4
        assert_eq!(review.overall_score, 600);
        assert_eq!(review.grammar_score, 200);
        assert_eq!(review.style_score, 0);

        let essay = storage.get_essay_by_id(essay_id).await.unwrap().unwrap();
        assert_eq!(essay.average_score, 600);
    }

    #[tokio::test]
    async fn test_submit_then_locked() {
        let (storage, _, review_id) = setup_with_review().await;

        let review = try_update_review(
            &storage,
            review_id,
            2,
            UpdateReviewRequest {
                is_submitted: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(review.is_submitted);

        // 已提交后分数与提交位都被锁定
        let err = try_update_review(
            &storage,
            review_id,
            2,
            UpdateReviewRequest {
                grammar_score: Some(50),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::ReviewAlreadySubmitted(_)));
    }

    #[tokio::test]
    async fn test_only_reviewer_can_update() {
        let (storage, _, review_id) = setup_with_review().await;

        let err = try_update_review(&storage, review_id, 3, UpdateReviewRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ForbiddenAccess(_)));
    }

    #[tokio::test]
    async fn test_score_out_of_range_rejected() {
        let (storage, _, review_id) = setup_with_review().await;

        let err = try_update_review(
            &storage,
            review_id,
            2,
            UpdateReviewRequest {
                clarity_score: Some(201),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));

        let err = try_update_review(
            &storage,
            review_id,
            2,
            UpdateReviewRequest {
                clarity_score: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_review() {
        let (storage, _, _) = setup_with_review().await;

        let err = try_update_review(&storage, 404, 2, UpdateReviewRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ReviewNotFound(_)));
    }
}
