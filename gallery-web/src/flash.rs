//! 跨重定向传递一次性提示消息
//!
//! 消息以base64编码存放在 `flash` cookie 中，下一次页面渲染时读取并删除。

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub const FLASH_COOKIE: &str = "flash";
const FLASH_PATH: &str = "/photo";

/// 写入提示消息
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let value = URL_SAFE_NO_PAD.encode(message);
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path(FLASH_PATH)
            .http_only(true),
    )
}

/// 取出并删除提示消息
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let message = URL_SAFE_NO_PAD
        .decode(cookie.value())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path(FLASH_PATH));
    (jar, message)
}
