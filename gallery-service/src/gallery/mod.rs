pub mod settings;

pub use settings::{GalleryModel, GallerySettings, GalleryView};

use async_trait::async_trait;
use gallery_api::{Payload, StorageError, StorageResult, StorageService, StoredResource};
use std::io::{self, ErrorKind};
use std::sync::Arc;
use tracing::{debug, error, info};
use url::Url;

/// 下载地址的路径前缀
const FILES_PATH: [&str; 2] = ["photo", "files"];

/// 画廊服务trait
#[async_trait]
pub trait GalleryService: Send + Sync {
    /// 默认显示配置
    fn settings(&self) -> &GallerySettings;

    /// 列出所有文件并构建画廊模型
    async fn gallery(&self, view: GalleryView, base_url: &Url) -> StorageResult<GalleryModel>;

    /// 保存上传的文件，返回保存的数量
    async fn upload(&self, payloads: Vec<Payload>) -> StorageResult<usize>;

    /// 加载单个文件及其内容
    async fn load(&self, filename: &str) -> StorageResult<(StoredResource, Vec<u8>)>;

    /// 根目录不存在时创建它，已存在时必须是可读的目录
    async fn ensure_initialized(&self) -> StorageResult<()>;

    /// 清空并重新创建存储
    async fn reset(&self) -> StorageResult<()>;
}

/// 默认画廊服务实现
/// 存储调用都是阻塞的，统一放到阻塞线程池执行
pub struct DefaultGalleryService {
    storage: Arc<dyn StorageService>,
    settings: GallerySettings,
}

impl DefaultGalleryService {
    pub fn new(storage: Arc<dyn StorageService>, settings: GallerySettings) -> Self {
        Self { storage, settings }
    }

    async fn blocking<T, F>(&self, task: F) -> StorageResult<T>
    where
        F: FnOnce(&dyn StorageService) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || task(storage.as_ref()))
            .await
            .map_err(|e| StorageError::io("Storage task failed", io::Error::other(e)))?
    }
}

/// 构建文件的下载地址：{base}/photo/files/{filename}
pub fn file_url(base_url: &Url, filename: &str) -> String {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(FILES_PATH).push(filename);
    }
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

#[async_trait]
impl GalleryService for DefaultGalleryService {
    fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    async fn gallery(&self, view: GalleryView, base_url: &Url) -> StorageResult<GalleryModel> {
        info!("loading all images from storage");
        let names = self
            .blocking(|storage| storage.list_all()?.collect::<StorageResult<Vec<_>>>())
            .await?;

        let files = names
            .iter()
            .map(|name| file_url(base_url, name))
            .collect();
        Ok(GalleryModel::new(&self.settings, view, files))
    }

    async fn upload(&self, payloads: Vec<Payload>) -> StorageResult<usize> {
        info!(
            "uploading images {:?}",
            payloads.iter().map(Payload::original_filename).collect::<Vec<_>>()
        );

        let count = payloads.len();
        self.blocking(move |storage| storage.store_all(payloads)).await?;
        Ok(count)
    }

    async fn load(&self, filename: &str) -> StorageResult<(StoredResource, Vec<u8>)> {
        info!("loading image as a resource with name {}", filename);
        let filename = filename.to_string();
        self.blocking(move |storage| {
            let resource = storage.load_as_resource(&filename)?;
            let content = resource.read()?;
            debug!("read {} ({} bytes)", resource.filename(), resource.size());
            Ok((resource, content))
        })
        .await
    }

    async fn ensure_initialized(&self) -> StorageResult<()> {
        self.blocking(|storage| match storage.initialize() {
            Err(StorageError::Initialization { source, .. })
                if source.kind() == ErrorKind::AlreadyExists =>
            {
                // 同名的普通文件不能当作根目录
                storage.list_all().map(|_| ()).inspect_err(|e| {
                    error!("existing storage root is not a readable directory: {}", e);
                })
            }
            other => other,
        })
        .await
    }

    async fn reset(&self) -> StorageResult<()> {
        info!("resetting storage");
        self.blocking(|storage| {
            storage.delete_all()?;
            storage.initialize()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_infra::{FileSystemStorageService, StorageProperties};
    use tempfile::TempDir;

    /// 创建基于临时目录的画廊服务
    fn create_test_service() -> (TempDir, DefaultGalleryService) {
        let temp_dir = TempDir::new().unwrap();
        let properties = StorageProperties {
            location: temp_dir.path().join("upload-dir"),
        };
        let storage: Arc<dyn StorageService> =
            Arc::new(FileSystemStorageService::new(&properties));
        let service = DefaultGalleryService::new(storage, GallerySettings::default());
        (temp_dir, service)
    }

    fn localhost() -> Url {
        Url::parse("http://localhost").unwrap()
    }

    #[test]
    fn test_file_url() {
        assert_eq!(
            file_url(&localhost(), "first.png"),
            "http://localhost/photo/files/first.png"
        );
        assert_eq!(
            file_url(&Url::parse("https://example.com/app/").unwrap(), "my photo.png"),
            "https://example.com/app/photo/files/my%20photo.png"
        );
    }

    #[tokio::test]
    async fn test_upload_then_gallery() {
        let (_temp_dir, service) = create_test_service();
        service.ensure_initialized().await.unwrap();

        let stored = service
            .upload(vec![Payload::new("first.png", b"abc".to_vec())])
            .await
            .unwrap();
        assert_eq!(stored, 1);

        let model = service.gallery(GalleryView::Rows("3".to_string()), &localhost()).await.unwrap();
        assert_eq!(model.files, vec!["http://localhost/photo/files/first.png"]);
        assert_eq!(model.row, "3");
        assert_eq!(model.width, "200");

        let (resource, content) = service.load("first.png").await.unwrap();
        assert_eq!(resource.filename(), "first.png");
        assert_eq!(resource.size(), 3);
        assert_eq!(content, b"abc");
    }

    #[tokio::test]
    async fn test_upload_propagates_rejection() {
        let (_temp_dir, service) = create_test_service();
        service.ensure_initialized().await.unwrap();

        let err = service
            .upload(vec![Payload::new("test.txt", b"abc".to_vec())])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_ensure_initialized_is_idempotent() {
        let (_temp_dir, service) = create_test_service();

        service.ensure_initialized().await.unwrap();
        service.ensure_initialized().await.unwrap();

        let model = service.gallery(GalleryView::Default, &localhost()).await.unwrap();
        assert!(model.files.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_initialized_rejects_file_root() {
        let (temp_dir, service) = create_test_service();
        std::fs::write(temp_dir.path().join("upload-dir"), b"not a directory").unwrap();

        let err = service.ensure_initialized().await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_reset_clears_files() {
        let (_temp_dir, service) = create_test_service();
        service.ensure_initialized().await.unwrap();
        service
            .upload(vec![Payload::new("first.png", b"abc".to_vec())])
            .await
            .unwrap();

        service.reset().await.unwrap();

        let model = service.gallery(GalleryView::Default, &localhost()).await.unwrap();
        assert!(model.files.is_empty());
        assert!(service.load("first.png").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_gallery_without_storage_fails() {
        let (_temp_dir, service) = create_test_service();

        let err = service.gallery(GalleryView::Default, &localhost()).await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
