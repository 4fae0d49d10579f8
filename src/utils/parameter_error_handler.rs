//! actix 请求参数错误处理器
//!
//! 将 JSON / Query 反序列化错误统一折叠进 ApiResponse 信封，
//! 避免默认的纯文本 400 响应。

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{HttpRequest, HttpResponse, error};

/// JSON 请求体解析错误处理器
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("请求体解析失败: {err}");
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        &message,
    ));
    error::InternalError::from_response(err, response).into()
}

/// Query 参数解析错误处理器
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("查询参数解析失败: {err}");
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        &message,
    ));
    error::InternalError::from_response(err, response).into()
}
