use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use std::convert::Infallible;
use url::Url;

/// 构建下载地址用的基础URL
/// 优先使用配置的外部地址，其次是请求的Host头
pub struct BaseUrl(pub Url);

#[async_trait::async_trait]
impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !state.trust_host_header {
            return Ok(BaseUrl(state.base_url.clone()));
        }

        let from_host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .and_then(|host| Url::parse(&format!("http://{}", host)).ok())
            // Host头里不能带路径或凭据
            .filter(|url| url.path() == "/" && url.username().is_empty());

        Ok(BaseUrl(from_host.unwrap_or_else(|| state.base_url.clone())))
    }
}
