use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path as FsPath;

const WHITE_CSS: &str = include_str!("../../static/white.css");
const BLACK_CSS: &str = include_str!("../../static/black.css");

/// 提供内置样式表
/// GET /css/:name
pub async fn serve_stylesheet(Path(name): Path<String>) -> Response {
    let content = match name.as_str() {
        "white.css" => WHITE_CSS,
        "black.css" => BLACK_CSS,
        _ => return (StatusCode::NOT_FOUND, "Resource not found").into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, get_content_type(&name)),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        content,
    )
        .into_response()
}

/// 根据文件扩展名获取Content-Type
pub fn get_content_type(path: &str) -> &'static str {
    let ext = FsPath::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext.to_lowercase().as_str() {
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "html" => "text/html",
        _ => "application/octet-stream",
    }
}
