pub mod file_system;
pub mod file_validator;

pub use file_system::FileSystemStorageService;
pub use file_validator::{is_legal_filename, FileTypeValidator};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageProperties {
    /// 存放上传文件的根目录
    pub location: PathBuf,
}

impl Default for StorageProperties {
    fn default() -> Self {
        Self {
            location: PathBuf::from("upload-dir"),
        }
    }
}
