use gallery_infra::StorageProperties;
use gallery_service::GallerySettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "gallery.toml";
const ENV_PREFIX: &str = "GALLERY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageProperties,
    pub gallery: GallerySettings,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// 请求体大小上限，如 "10MB"
    pub max_request_body_size: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            max_request_body_size: "10MB".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// 对外访问地址，用于生成下载链接；未配置时使用请求的Host头
    pub external_url: Option<String>,
    /// 自定义模板目录；未配置时使用内置模板
    pub template_dir: Option<PathBuf>,
    /// 每次打开上传表单时清空存储
    pub reset_on_form: bool,
}

impl Config {
    /// 依次加载 gallery.toml 和 GALLERY__ 前缀的环境变量，后者优先
    pub fn load() -> Result<Self, config::ConfigError> {
        // 如果存在.env文件，先把它加载到环境变量
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded .env file");
        }

        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}
