pub mod common;
pub mod essays;
pub mod reviews;
pub mod users;

pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 业务错误码
///
/// 序列化时转为 i32 放入 ApiResponse.code，路由层据此映射 HTTP 状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 40000,
    ReviewAlreadySubmitted = 40001,
    EssayContentLocked = 40002,

    Unauthorized = 40100,

    Forbidden = 40300,
    CannotReviewOwnEssay = 40301,
    CannotLikeOwnEssay = 40302,

    NotFound = 40400,
    EssayNotFound = 40401,
    ReviewNotFound = 40402,
    UserNotFound = 40403,

    InternalServerError = 50000,
    AnalysisFailed = 50001,
}

/// 程序启动时间（用于运行时长统计）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
