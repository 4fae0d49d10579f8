pub mod backend;
pub mod fallback;
pub mod pipeline;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{EssayHubError, Result};
use crate::models::ApiResponse;
use crate::services::error_response;
use crate::storage::Storage;

pub struct AnalysisService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalysisService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 触发/刷新单篇随笔的分析
    /// POST /essays/{id}/analyze
    pub async fn analyze_essay(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match try_analyze_essay(&storage, essay_id, user_id).await {
            Ok(review) => Ok(HttpResponse::Ok().json(ApiResponse::success(review, "分析完成"))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 批量扫描公开随笔
    /// POST /analysis/batch
    pub async fn batch_analyze(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match pipeline::batch_analyze(&storage).await {
            Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "批量分析完成"))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

/// 手动触发分析（仅作者可刷新自己随笔的分析结果）
pub(crate) async fn try_analyze_essay(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<crate::models::reviews::entities::PeerReview> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    if essay.author_id != user_id {
        return Err(EssayHubError::forbidden_access(
            "只有作者可以触发随笔分析",
        ));
    }

    pipeline::analyze_essay(storage, essay_id).await
}
