use crate::error::WebError;
use axum::response::{Html, IntoResponse, Response};
use gallery_infra::{TemplateContext, TemplateRenderer};
use serde::Serialize;
use tracing::{error, info, warn};

pub const UPLOAD_FORM: &str = "uploadForm.html";
pub const PHOTO_GALLERY: &str = "photoGallery.html";
pub const ERROR: &str = "error.html";

/// 上传表单模型
#[derive(Debug, Serialize)]
pub struct UploadFormModel<'a> {
    pub stylesheet: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 错误页面模型
#[derive(Debug, Serialize)]
pub struct ErrorModel {
    pub msg: String,
    pub code: u16,
}

/// 渲染视图
pub fn render<T: Serialize>(
    engine: &dyn TemplateRenderer,
    view: &str,
    model: &T,
) -> Result<Html<String>, WebError> {
    TemplateContext::from_serialize(model)
        .and_then(|context| engine.render(view, &context))
        .map(Html)
        .map_err(|cause| WebError::Render {
            view: view.to_string(),
            cause,
        })
}

/// 渲染错误页面，模板本身出错时退化为纯文本
pub fn error_page(engine: &dyn TemplateRenderer, err: &WebError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!("storage exception has occurred: {}", err);
    } else {
        info!("request failed with {}: {}", status.as_u16(), err);
    }

    let model = ErrorModel {
        msg: err.to_string(),
        code: status.as_u16(),
    };
    match render(engine, ERROR, &model) {
        Ok(html) => (status, html).into_response(),
        Err(render_err) => {
            warn!("{}", render_err);
            (status, model.msg).into_response()
        }
    }
}
