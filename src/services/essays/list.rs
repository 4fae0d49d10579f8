use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EssayService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::essays::{
    requests::EssayListQuery,
    responses::EssayListResponse,
};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::text::truncate_search_term;

/// 列表硬上限
pub(crate) const LIST_LIMIT: u64 = 50;

/// 列出随笔
///
/// 只有查询自己的随笔时才能看到非公开内容；其余情况一律强制
/// `is_public = true`。搜索关键词截断到 100 字符。
pub(crate) async fn try_list_essays(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    mut query: EssayListQuery,
) -> Result<EssayListResponse> {
    let listing_own = query.author_id == Some(user_id);
    if !listing_own {
        query.public = Some(true);
    }

    if let Some(search) = query.search.take() {
        let trimmed = search.trim().to_string();
        if !trimmed.is_empty() {
            query.search = Some(truncate_search_term(&trimmed));
        }
    }

    let items = storage.list_essays(query, LIST_LIMIT).await?;
    Ok(EssayListResponse { items })
}

/// 列出/发现随笔
/// GET /essays
pub async fn list_essays(
    service: &EssayService,
    request: &HttpRequest,
    user_id: i64,
    query: EssayListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match try_list_essays(&storage, user_id, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
