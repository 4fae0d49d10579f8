pub mod create;
pub mod delete;
pub mod detail;
pub mod like;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::essays::requests::{CreateEssayRequest, EssayListQuery, UpdateEssayRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct EssayService {
    storage: Option<Arc<dyn Storage>>,
}

impl EssayService {
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

    /// 创建随笔
    pub async fn create_essay(
        &self,
        request: &HttpRequest,
        user: User,
        req: CreateEssayRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_essay(self, request, user, req).await
    }

    /// 获取随笔详情
    pub async fn get_essay(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_essay(self, request, essay_id, user_id).await
    }

    /// 列出随笔
    pub async fn list_essays(
        &self,
        request: &HttpRequest,
        user_id: i64,
        query: EssayListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_essays(self, request, user_id, query).await
    }

    /// 更新随笔
    pub async fn update_essay(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
        req: UpdateEssayRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_essay(self, request, essay_id, user_id, req).await
    }

    /// 删除随笔
    pub async fn delete_essay(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_essay(self, request, essay_id, user_id).await
    }

    /// 切换点赞
    pub async fn toggle_like(
        &self,
        request: &HttpRequest,
        essay_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        like::toggle_like(self, request, essay_id, user_id).await
    }
}
