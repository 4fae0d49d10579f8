use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ReviewService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::reviews::{
    entities::{PeerReview, Reviewer},
    requests::AddCorrectionRequest,
};
use crate::services::error_response;
use crate::storage::Storage;

/// 追加批注
///
/// 批注在落库前针对随笔当前内容做锚点校验：选区偏移必须指向与
/// `selected_text` 逐字节一致的切片。已提交的互评拒绝追加。
pub(crate) async fn try_add_correction(
    storage: &Arc<dyn Storage>,
    review_id: i64,
    user_id: i64,
    req: AddCorrectionRequest,
) -> Result<PeerReview> {
    let review = storage
        .get_peer_review_by_id(review_id)
        .await?
        .ok_or_else(|| EssayHubError::review_not_found("互评不存在"))?;

    if review.reviewer != Reviewer::Human(user_id) {
        return Err(EssayHubError::forbidden_access("只有评审者本人可以追加批注"));
    }

    if review.is_submitted {
        return Err(EssayHubError::review_already_submitted(
            "互评已提交，不可再追加批注",
        ));
    }

    let essay = storage
        .get_essay_by_id(review.essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    let correction = req.into_correction();
    correction.validate_against(&essay.content)?;

    storage
        .append_correction(review_id, correction)
        .await?
        .ok_or_else(|| EssayHubError::review_not_found("互评不存在"))
}

/// 追加批注
/// POST /reviews/{id}/corrections
pub async fn add_correction(
    service: &ReviewService,
    request: &HttpRequest,
    review_id: i64,
    user_id: i64,
    req: AddCorrectionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_add_correction(&storage, review_id, user_id, req).await {
        Ok(review) => Ok(HttpResponse::Ok().json(ApiResponse::success(review, "批注已追加"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::essays::requests::CreateEssayRequest;
    use crate::models::reviews::entities::ReviewCategory;
    use crate::models::reviews::requests::{CreateReviewRequest, UpdateReviewRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    const CONTENT: &str = "the cat sat on the mat";

    async fn setup_with_review() -> (Arc<dyn Storage>, i64) {
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
                6,
                CreateEssayRequest {
                    title: "t".into(),
                    content: CONTENT.into(),
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
        (storage, review.id)
    }

    fn anchored_request() -> AddCorrectionRequest {
        AddCorrectionRequest {
            category: ReviewCategory::Grammar,
            selected_text: "cat".into(),
            text_start_index: 4,
            text_end_index: 7,
            comment: "noun choice".into(),
        }
    }

    #[tokio::test]
    async fn test_corrections_append_in_order() {
        let (storage, review_id) = setup_with_review().await;

        try_add_correction(&storage, review_id, 2, anchored_request())
            .await
            .unwrap();
        let review = try_add_correction(
            &storage,
            review_id,
            2,
            AddCorrectionRequest {
                category: ReviewCategory::Style,
                selected_text: "mat".into(),
                text_start_index: 19,
                text_end_index: 22,
                comment: "repetitive".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(review.corrections.len(), 2);
        assert_eq!(review.corrections[0].selected_text, "cat");
        assert_eq!(review.corrections[1].selected_text, "mat");
    }

    #[tokio::test]
    async fn test_mismatched_anchor_rejected() {
        let (storage, review_id) = setup_with_review().await;

        let err = try_add_correction(
            &storage,
            review_id,
            2,
            AddCorrectionRequest {
                selected_text: "dog".into(),
                ..anchored_request()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EssayHubError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submitted_review_rejects_corrections() {
        let (storage, review_id) = setup_with_review().await;

        storage
            .update_peer_review(review_id, UpdateReviewRequest {
                is_submitted: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = try_add_correction(&storage, review_id, 2, anchored_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ReviewAlreadySubmitted(_)));
    }

    #[tokio::test]
    async fn test_only_reviewer_can_append() {
        let (storage, review_id) = setup_with_review().await;

        let err = try_add_correction(&storage, review_id, 3, anchored_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EssayHubError::ForbiddenAccess(_)));
    }

    #[tokio::test]
    async fn test_empty_selection_general_remark() {
        let (storage, review_id) = setup_with_review().await;

        let review = try_add_correction(
            &storage,
            review_id,
            2,
            AddCorrectionRequest {
                category: ReviewCategory::Content,
                selected_text: String::new(),
                text_start_index: 0,
                text_end_index: 0,
                comment: "overall: needs sources".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(review.corrections.len(), 1);
        assert!(review.corrections[0].selected_text.is_empty());
    }
}
