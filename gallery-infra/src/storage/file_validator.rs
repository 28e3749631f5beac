use gallery_api::{Payload, Rejection};
use std::collections::BTreeSet;

/// 文件类型验证器
/// 扩展名按后缀匹配，区分大小写
#[derive(Debug, Clone)]
pub struct FileTypeValidator {
    /// 允许的文件扩展名集合（不含点号）
    allowed_extensions: BTreeSet<String>,
}

impl FileTypeValidator {
    /// 创建不允许任何扩展名的验证器
    pub fn new() -> Self {
        Self {
            allowed_extensions: BTreeSet::new(),
        }
    }

    /// 添加允许的文件扩展名
    pub fn allow_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.allowed_extensions
            .insert(ext.trim_start_matches('.').to_string());
        self
    }

    /// 只允许PNG图片
    pub fn png_only() -> Self {
        Self::new().allow_extension("png")
    }

    /// 检查文件名的扩展名
    pub fn validate_extension(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.allowed_extensions.contains(ext))
    }

    /// 按顺序校验上传文件：空内容、扩展名、文件名
    pub fn check(&self, payload: &Payload) -> Result<(), Rejection> {
        let filename = payload.original_filename();
        if payload.is_empty() {
            return Err(Rejection::EmptyFile);
        }
        if !self.validate_extension(filename) {
            return Err(Rejection::WrongExtension);
        }
        if !is_legal_filename(filename) {
            return Err(Rejection::IllegalName);
        }
        Ok(())
    }
}

impl Default for FileTypeValidator {
    fn default() -> Self {
        Self::png_only()
    }
}

/// 文件名只能是根目录下的单个路径组成部分
pub fn is_legal_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0'])
}
