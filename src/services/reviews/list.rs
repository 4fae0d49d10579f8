use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ReviewService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::reviews::responses::ReviewListResponse;
use crate::services::error_response;
use crate::storage::Storage;

/// 列出随笔的互评（含草稿与 AI 评审）
///
/// 与随笔详情同一套可见性门禁：公开或本人。
pub(crate) async fn try_list_reviews(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<ReviewListResponse> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if !essay.is_public && essay.author_id != user_id {
        return Err(EssayHubError::forbidden_access("没有查看该随笔的权限"));
    }

    let items = storage.list_peer_reviews(essay_id).await?;
    Ok(ReviewListResponse { items })
}

/// 列出互评
/// GET /essays/{id}/reviews
pub async fn list_reviews(
    service: &ReviewService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_list_reviews(&storage, essay_id, user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
