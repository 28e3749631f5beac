use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use gallery_api::Payload;
use gallery_service::GalleryView;
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;
use url::Url;

use super::static_resources::get_content_type;
use crate::view::{self, UploadFormModel, PHOTO_GALLERY, UPLOAD_FORM};
use crate::{extractors::BaseUrl, flash, AppState, WebError};

pub const UPLOADED_MESSAGE: &str = "The photos has been uploaded";
pub const CLEARED_MESSAGE: &str = "The storage has been cleared";

static ROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("row pattern is valid"));
static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3})x([0-9]{3})$").expect("size pattern is valid"));

/// 上传表单
/// GET /photo
pub async fn get_upload_form(State(state): State<AppState>, jar: CookieJar) -> Response {
    info!("getting upload form");
    state.respond(upload_form_page(&state, jar).await)
}

async fn upload_form_page(state: &AppState, jar: CookieJar) -> Result<Response, WebError> {
    if state.reset_on_form {
        state.gallery_service.reset().await?;
    } else {
        state.gallery_service.ensure_initialized().await?;
    }

    let (jar, message) = flash::take(jar);
    let model = UploadFormModel {
        stylesheet: &state.gallery_service.settings().stylesheet,
        message,
    };
    let html = view::render(state.template_engine.as_ref(), UPLOAD_FORM, &model)?;
    Ok((jar, html).into_response())
}

/// 清空存储
/// POST /photo/reset
pub async fn reset_storage(State(state): State<AppState>, jar: CookieJar) -> Response {
    info!("clearing storage");
    let result = state
        .gallery_service
        .reset()
        .await
        .map(|_| redirect(flash::set(jar, CLEARED_MESSAGE), "/photo"))
        .map_err(WebError::from);
    state.respond(result)
}

/// 画廊页面
/// GET /photo/gallery
pub async fn list_uploaded_files(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    jar: CookieJar,
) -> Response {
    info!("getting gallery page");
    state.respond(gallery_page(&state, GalleryView::Default, &base_url, jar).await)
}

/// 黑色背景的画廊页面
/// GET /photo/blackbackground
pub async fn change_background(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    jar: CookieJar,
) -> Response {
    info!("setting the black background stylesheet");
    state.respond(gallery_page(&state, GalleryView::BlackBackground, &base_url, jar).await)
}

/// 指定行数
/// GET /photo/row/:row_number
pub async fn set_row_numbers(
    State(state): State<AppState>,
    Path(row_number): Path<String>,
    BaseUrl(base_url): BaseUrl,
    jar: CookieJar,
) -> Response {
    if !ROW_PATTERN.is_match(&row_number) {
        return state.respond(Err(WebError::NotFound(format!("/photo/row/{}", row_number))));
    }

    info!("setting number of image rows to {}", row_number);
    state.respond(gallery_page(&state, GalleryView::Rows(row_number), &base_url, jar).await)
}

/// 指定图片尺寸，格式为 WWWxHHH
/// GET /photo/wh/:wh
pub async fn set_picture_size(
    State(state): State<AppState>,
    Path(wh): Path<String>,
    BaseUrl(base_url): BaseUrl,
    jar: CookieJar,
) -> Response {
    let Some((width, height)) = parse_size(&wh) else {
        return state.respond(Err(WebError::NotFound(format!("/photo/wh/{}", wh))));
    };

    info!("setting image size to {}", wh);
    let view = GalleryView::Size {
        width: width.to_string(),
        height: height.to_string(),
    };
    state.respond(gallery_page(&state, view, &base_url, jar).await)
}

/// 原始尺寸
/// GET /photo/original
pub async fn get_pictures_with_original_size(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    jar: CookieJar,
) -> Response {
    info!("setting image to original size");
    state.respond(gallery_page(&state, GalleryView::Original, &base_url, jar).await)
}

async fn gallery_page(
    state: &AppState,
    view: GalleryView,
    base_url: &Url,
    jar: CookieJar,
) -> Result<Response, WebError> {
    let (jar, message) = flash::take(jar);
    let model = state
        .gallery_service
        .gallery(view, base_url)
        .await?
        .with_message(message);
    let html = view::render(state.template_engine.as_ref(), PHOTO_GALLERY, &model)?;
    Ok((jar, html).into_response())
}

/// 以附件形式下载文件
/// GET /photo/files/:filename
pub async fn serve_file(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    state.respond(file_response(&state, &filename).await)
}

async fn file_response(state: &AppState, filename: &str) -> Result<Response, WebError> {
    let (resource, content) = state.gallery_service.load(filename).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        resource.filename().replace('"', "'")
    );
    Ok((
        [
            (header::CONTENT_TYPE, get_content_type(resource.filename()).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

/// 上传文件
/// POST /photo （multipart字段名为 file，可以有多个）
pub async fn handle_file_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    state.respond(upload_files(&state, jar, multipart).await)
}

async fn upload_files(
    state: &AppState,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut payloads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(format!("Failed to read {}: {}", filename, e)))?;
        payloads.push(Payload::new(filename, content.to_vec()));
    }

    if payloads.is_empty() {
        return Err(WebError::BadRequest(
            "Required request part 'file' is not present".to_string(),
        ));
    }

    state.gallery_service.upload(payloads).await?;
    Ok(redirect(flash::set(jar, UPLOADED_MESSAGE), "/photo/gallery"))
}

/// 302重定向，同时写回cookie
fn redirect(jar: CookieJar, location: &'static str) -> Response {
    (StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response()
}

/// 解析 WWWxHHH，宽高都必须是三位数字
fn parse_size(wh: &str) -> Option<(&str, &str)> {
    let captures = SIZE_PATTERN.captures(wh)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}
