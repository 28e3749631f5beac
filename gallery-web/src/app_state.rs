use crate::error::WebError;
use crate::view;
use axum::response::Response;
use gallery_infra::TemplateRenderer;
use gallery_service::GalleryService;
use std::sync::Arc;
use url::Url;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub gallery_service: Arc<dyn GalleryService>,
    pub template_engine: Arc<dyn TemplateRenderer>,
    /// 构建下载地址的基础URL
    pub base_url: Url,
    /// 未配置外部地址时，使用请求的Host头构建下载地址
    pub trust_host_header: bool,
    /// 打开上传表单时清空存储
    pub reset_on_form: bool,
}

impl AppState {
    /// 把处理结果转换成响应，错误渲染为错误页面
    pub fn respond(&self, result: Result<Response, WebError>) -> Response {
        match result {
            Ok(response) => response,
            Err(err) => view::error_page(self.template_engine.as_ref(), &err),
        }
    }
}
