use crate::config::Config;
use crate::error::{GalleryError, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use gallery_infra::{FileSystemStorageService, TeraTemplateEngine};
use gallery_service::{DefaultGalleryService, GalleryService};
use gallery_web::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost";

/// 创建应用路由
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(gallery_web::routes())
        .layer(
            ServiceBuilder::new()
                // 先添加的层在外层执行
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// 健康检查端点
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 初始化应用状态
pub async fn init_app_state(config: &Config) -> Result<AppState> {
    let storage = Arc::new(FileSystemStorageService::new(&config.storage));
    info!("Storage root: {}", storage.root_location().display());

    let gallery_service: Arc<dyn GalleryService> = Arc::new(DefaultGalleryService::new(
        storage,
        config.gallery.clone(),
    ));
    gallery_service.ensure_initialized().await?;

    let template_engine = Arc::new(
        TeraTemplateEngine::new(config.web.template_dir.as_deref())
            .map_err(GalleryError::Template)?,
    );

    // 配置了外部地址时不再信任Host头
    let (base_url, trust_host_header) = match &config.web.external_url {
        Some(external_url) => (Url::parse(external_url)?, false),
        None => (Url::parse(DEFAULT_BASE_URL)?, true),
    };

    Ok(AppState {
        gallery_service,
        template_engine,
        base_url,
        trust_host_header,
        reset_on_form: config.web.reset_on_form,
    })
}

/// 解析 "10MB"、"512KB"、"1GB"、"2048" 这样的大小配置
pub fn parse_size(value: &str) -> Result<usize> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);

    let number: usize = number
        .parse()
        .map_err(|_| format!("Invalid size: {}", value))?;
    let multiplier: usize = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1024,
        "MB" | "M" => 1024 * 1024,
        "GB" | "G" => 1024 * 1024 * 1024,
        other => return Err(format!("Unknown size unit: {}", other).into()),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: {}", value).into())
}
