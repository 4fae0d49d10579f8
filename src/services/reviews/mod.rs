pub mod correction;
pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{EssayHubError, Result};
use crate::models::reviews::requests::{
    AddCorrectionRequest, CreateReviewRequest, UpdateReviewRequest,
};
use crate::storage::Storage;

/// 分数的名义区间
pub(crate) const SCORE_MIN: i32 = 0;
pub(crate) const SCORE_MAX: i32 = 200;

/// 校验显式给出的类别分数；创建与更新共用同一道门禁
pub(crate) fn check_score_range(scores: [Option<i32>; 6]) -> Result<()> {
    for score in scores.into_iter().flatten() {
        if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
            return Err(EssayHubError::validation(format!(
                "分数必须在 {SCORE_MIN} 到 {SCORE_MAX} 之间"
            )));
        }
    }
    Ok(())
}

pub struct ReviewService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReviewService {
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

    /// 创建互评（幂等）
    pub async fn create_review(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
        req: CreateReviewRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_review(self, request, essay_id, user_id, req).await
    }

    /// 更新互评 / 提交
    pub async fn update_review(
        &self,
        request: &HttpRequest,
        review_id: i64,
        user_id: i64,
        req: UpdateReviewRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_review(self, request, review_id, user_id, req).await
    }

    /// 追加批注
    pub async fn add_correction(
        &self,
        request: &HttpRequest,
        review_id: i64,
        user_id: i64,
        req: AddCorrectionRequest,
    ) -> ActixResult<HttpResponse> {
        correction::add_correction(self, request, review_id, user_id, req).await
    }

    /// 列出随笔的互评
    pub async fn list_reviews(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_reviews(self, request, essay_id, user_id).await
    }
}
