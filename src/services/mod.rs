pub mod analysis;
pub mod essays;
pub mod reviews;

pub use analysis::AnalysisService;
pub use essays::EssayService;
pub use reviews::ReviewService;

use crate::errors::EssayHubError;
use crate::models::{ApiResponse, ErrorCode};
use actix_web::HttpResponse;

/// 将业务错误翻译为 HTTP 响应
///
/// 路由层唯一的错误出口；业务码与 HTTP 状态在此一一对应。
pub(crate) fn error_response(err: &EssayHubError) -> HttpResponse {
    let message = err.message();
    match err {
        EssayHubError::EssayNotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::EssayNotFound, message))
        }
        EssayHubError::ReviewNotFound(_) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ReviewNotFound, message)),
        EssayHubError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, message))
        }
        EssayHubError::CannotReviewOwnEssay(_) => HttpResponse::Forbidden().json(
            ApiResponse::error_empty(ErrorCode::CannotReviewOwnEssay, message),
        ),
        EssayHubError::CannotLikeOwnEssay(_) => HttpResponse::Forbidden().json(
            ApiResponse::error_empty(ErrorCode::CannotLikeOwnEssay, message),
        ),
        EssayHubError::ForbiddenAccess(_) | EssayHubError::Authorization(_) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
        }
        EssayHubError::ReviewAlreadySubmitted(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ReviewAlreadySubmitted, message),
        ),
        EssayHubError::EssayContentLocked(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::EssayContentLocked, message),
        ),
        EssayHubError::Validation(_) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
        }
        EssayHubError::Authentication(_) => HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message)),
        EssayHubError::AnalysisBackend(_) | EssayHubError::AnalysisFailed(_) => {
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::AnalysisFailed, message))
        }
        _ => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            message,
        )),
    }
}
