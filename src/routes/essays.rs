use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::essays::requests::{CreateEssayRequest, EssayListQuery, UpdateEssayRequest};
use crate::models::reviews::requests::CreateReviewRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{AnalysisService, EssayService, ReviewService};

// 懒加载的全局服务实例
static ESSAY_SERVICE: Lazy<EssayService> = Lazy::new(EssayService::new_lazy);
static REVIEW_SERVICE: Lazy<ReviewService> = Lazy::new(ReviewService::new_lazy);
static ANALYSIS_SERVICE: Lazy<AnalysisService> = Lazy::new(AnalysisService::new_lazy);

// 列出/发现随笔
pub async fn list_essays(
    req: HttpRequest,
    query: web::Query<EssayListQuery>,
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

    ESSAY_SERVICE
        .list_essays(&req, user_id, query.into_inner())
        .await
}

// 创建随笔
pub async fn create_essay(
    req: HttpRequest,
    body: web::Json<CreateEssayRequest>,
) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user_claims(&req) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ESSAY_SERVICE
        .create_essay(&req, user, body.into_inner())
        .await
}

// 获取随笔详情
pub async fn get_essay(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ESSAY_SERVICE.get_essay(&req, path.into_inner(), user_id).await
}

// 更新随笔
pub async fn update_essay(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateEssayRequest>,
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

    ESSAY_SERVICE
        .update_essay(&req, path.into_inner(), user_id, body.into_inner())
        .await
}

// 删除随笔
pub async fn delete_essay(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ESSAY_SERVICE
        .delete_essay(&req, path.into_inner(), user_id)
        .await
}

// 切换点赞
pub async fn toggle_like(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ESSAY_SERVICE
        .toggle_like(&req, path.into_inner(), user_id)
        .await
}

// 列出随笔的互评
pub async fn list_reviews(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
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
        .list_reviews(&req, path.into_inner(), user_id)
        .await
}

// 创建互评
pub async fn create_review(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateReviewRequest>,
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
        .create_review(&req, path.into_inner(), user_id, body.into_inner())
        .await
}

// 触发/刷新分析
pub async fn analyze_essay(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ANALYSIS_SERVICE
        .analyze_essay(&req, path.into_inner(), user_id)
        .await
}

// 配置路由
pub fn configure_essays_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/essays")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_essays))
            .route("", web::post().to(create_essay))
            .route("/{id}", web::get().to(get_essay))
            .route("/{id}", web::patch().to(update_essay))
            .route("/{id}", web::delete().to(delete_essay))
            .route("/{id}/like", web::post().to(toggle_like))
            .route("/{id}/reviews", web::get().to(list_reviews))
            .route("/{id}/reviews", web::post().to(create_review))
            .route("/{id}/analyze", web::post().to(analyze_essay)),
    );
}
