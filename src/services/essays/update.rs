use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EssayService;
use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::models::essays::{entities::Essay, requests::UpdateEssayRequest};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::word_count;

/// 更新随笔（仅作者）
///
/// 一旦随笔存在任何评审，内容即被锁定：批注偏移锚定在创建时刻的
/// 内容上，改动正文会使全部锚点失效。标题与可见性仍可修改。
pub(crate) async fn try_update_essay(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
    update: UpdateEssayRequest,
) -> Result<Essay> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if essay.author_id != user_id {
        return Err(EssayHubError::forbidden_access("只有作者可以修改随笔"));
    }

    let mut recounted = None;
    if let Some(ref content) = update.content {
        if essay.review_count > 0 {
            return Err(EssayHubError::essay_content_locked(
                "随笔已有评审，内容不可再修改",
            ));
        }
        if content.trim().is_empty() {
            return Err(EssayHubError::validation("内容不能为空"));
        }
        recounted = Some(word_count(content));
    }

    if let Some(ref title) = update.title
        && title.trim().is_empty()
    {
        return Err(EssayHubError::validation("标题不能为空"));
    }

    storage
        .update_essay(essay_id, update, recounted)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))
}

/// 更新随笔
/// PATCH /essays/{id}
pub async fn update_essay(
    service: &EssayService,
    request: &HttpRequest,
    essay_id: i64,
    user_id: i64,
    req: UpdateEssayRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_update_essay(&storage, essay_id, user_id, req).await {
        Ok(essay) => Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "更新成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
