use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 上传文件被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 文件内容为空
    EmptyFile,
    /// 扩展名不是允许的类型
    WrongExtension,
    /// 文件名包含路径分隔符或其他非法内容
    IllegalName,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::EmptyFile => "empty file",
            Rejection::WrongExtension => "wrong extension",
            Rejection::IllegalName => "illegal filename",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 存储层错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to store file {filename}: {reason}")]
    InvalidInput { reason: Rejection, filename: String },

    #[error("Could not read file: {filename}")]
    NotFound {
        filename: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not initialize storage at {}: {source}", path.display())]
    Initialization {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn invalid(reason: Rejection, filename: impl Into<String>) -> Self {
        StorageError::InvalidInput {
            reason,
            filename: filename.into(),
        }
    }

    pub fn not_found(filename: impl Into<String>) -> Self {
        StorageError::NotFound {
            filename: filename.into(),
            source: None,
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }

    /// 是否应当作为"文件不存在"报告给调用方
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
