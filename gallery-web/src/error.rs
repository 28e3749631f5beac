use axum::http::StatusCode;
use gallery_api::StorageError;
use thiserror::Error;

/// Web层错误
#[derive(Error, Debug)]
pub enum WebError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to render view {view}: {cause:#}")]
    Render { view: String, cause: anyhow::Error },

    #[error("{0}")]
    BadRequest(String),

    #[error("No page found for {0}")]
    NotFound(String),
}

impl WebError {
    /// 文件不存在映射为404，其他存储错误映射为500
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Storage(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            WebError::Storage(_) | WebError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}
