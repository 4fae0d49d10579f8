use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::AnalysisService;

// 懒加载的全局 AnalysisService 实例
static ANALYSIS_SERVICE: Lazy<AnalysisService> = Lazy::new(AnalysisService::new_lazy);

// 批量扫描公开随笔
pub async fn batch_analyze(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYSIS_SERVICE.batch_analyze(&req).await
}

// 配置路由
pub fn configure_analysis_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analysis")
            .wrap(middlewares::RequireJWT)
            .route("/batch", web::post().to(batch_analyze)),
    );
}
