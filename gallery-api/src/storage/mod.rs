pub mod error;
pub mod resource;

pub use error::{Rejection, StorageError, StorageResult};
pub use resource::{FileNames, Payload, StoredResource};

use std::path::PathBuf;

/// 文件存储服务trait
///
/// 所有操作都是同步的文件系统调用，调用方负责把它们放到合适的线程上执行。
pub trait StorageService: Send + Sync {
    /// 创建根目录
    /// 目录已存在或无法创建时返回 [`StorageError::Initialization`]
    fn initialize(&self) -> StorageResult<()>;

    /// 校验并保存单个上传文件
    fn store(&self, payload: Payload) -> StorageResult<()>;

    /// 按顺序保存多个文件，遇到第一个失败立即返回
    /// 已经保存成功的文件不会回滚
    fn store_all(&self, payloads: Vec<Payload>) -> StorageResult<()> {
        for payload in payloads {
            self.store(payload)?;
        }
        Ok(())
    }

    /// 列出根目录下的所有文件名（不递归）
    /// 目录无法读取时直接返回错误；每次调用都会得到一个新的迭代器
    fn list_all(&self) -> StorageResult<FileNames>;

    /// 计算文件在根目录下的路径，不检查文件是否存在
    fn resolve_path(&self, filename: &str) -> PathBuf;

    /// 以可读资源的形式加载文件
    fn load_as_resource(&self, filename: &str) -> StorageResult<StoredResource>;

    /// 递归删除根目录，目录不存在时什么也不做
    fn delete_all(&self) -> StorageResult<()>;
}
