use super::{StorageError, StorageResult};
use std::fmt;
use std::path::PathBuf;

/// 上传的文件：原始文件名加内容，只在一次store调用中有效
#[derive(Clone)]
pub struct Payload {
    original_filename: String,
    content: Vec<u8>,
}

impl Payload {
    pub fn new(original_filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            original_filename: original_filename.into(),
            content: content.into(),
        }
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("original_filename", &self.original_filename)
            .field("len", &self.content.len())
            .finish()
    }
}

/// 已存储文件的可读句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResource {
    filename: String,
    path: PathBuf,
    size: u64,
}

impl StoredResource {
    pub fn new(filename: impl Into<String>, path: PathBuf, size: u64) -> Self {
        Self {
            filename: filename.into(),
            path,
            size,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// 读取文件全部内容
    pub fn read(&self) -> StorageResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| StorageError::NotFound {
            filename: self.filename.clone(),
            source: Some(e),
        })
    }
}

/// 根目录下文件名的惰性序列
///
/// 目录项读取失败会作为 `Err` 项返回，不会被跳过。
pub struct FileNames {
    inner: Box<dyn Iterator<Item = StorageResult<String>> + Send>,
}

impl FileNames {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = StorageResult<String>> + Send + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }

    /// 从已知的文件名构建序列
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self::new(names.into_iter().map(Ok))
    }
}

impl Iterator for FileNames {
    type Item = StorageResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for FileNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileNames").finish_non_exhaustive()
    }
}
