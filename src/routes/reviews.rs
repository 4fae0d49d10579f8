use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::reviews::requests::{AddCorrectionRequest, UpdateReviewRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ReviewService;

// 懒加载的全局 ReviewService 实例
static REVIEW_SERVICE: Lazy<ReviewService> = Lazy::new(ReviewService::new_lazy);

// 更新互评 / 提交
pub async fn update_review(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateReviewRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    REVIEW_SERVICE
        .update_review(&req, path.into_inner(), user_id, body.into_inner())
        .await
}

// 追加批注
pub async fn add_correction(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddCorrectionRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    REVIEW_SERVICE
        .add_correction(&req, path.into_inner(), user_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_reviews_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reviews")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::patch().to(update_review))
            .route("/{id}/corrections", web::post().to(add_correction)),
    );
}
