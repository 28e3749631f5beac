use super::{is_legal_filename, FileTypeValidator, StorageProperties};
use gallery_api::{FileNames, Payload, StorageError, StorageResult, StorageService, StoredResource};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// 本地文件系统存储实现
///
/// 根目录由一把读写锁保护：创建、写入、清空走写锁，列表和加载走读锁。
/// 返回的迭代器和资源句柄不持有锁。
pub struct FileSystemStorageService {
    root_location: PathBuf,
    validator: FileTypeValidator,
    lock: RwLock<()>,
}

impl FileSystemStorageService {
    pub fn new(properties: &StorageProperties) -> Self {
        Self {
            root_location: properties.location.clone(),
            validator: FileTypeValidator::default(),
            lock: RwLock::new(()),
        }
    }

    pub fn root_location(&self) -> &Path {
        &self.root_location
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageService for FileSystemStorageService {
    fn initialize(&self) -> StorageResult<()> {
        info!("Initializing storage at {}", self.root_location.display());
        let _guard = self.write_guard();
        fs::create_dir(&self.root_location).map_err(|e| {
            error!("Could not initialize storage: {}", e);
            StorageError::Initialization {
                path: self.root_location.clone(),
                source: e,
            }
        })
    }

    fn store(&self, payload: Payload) -> StorageResult<()> {
        let filename = payload.original_filename();
        info!("Storing file: {} ({} bytes)", filename, payload.len());

        if let Err(reason) = self.validator.check(&payload) {
            debug!("Rejected file {}: {}", filename, reason);
            return Err(StorageError::invalid(reason, filename));
        }

        let target = self.resolve_path(filename);
        let _guard = self.write_guard();
        // 同名文件已存在时失败，不覆盖
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .and_then(|mut file| file.write_all(payload.content()))
            .map_err(|e| {
                error!("Failed to write {}: {}", target.display(), e);
                StorageError::io(format!("Failed to store file {}", filename), e)
            })
    }

    fn store_all(&self, payloads: Vec<Payload>) -> StorageResult<()> {
        info!("Storing {} files", payloads.len());
        for payload in payloads {
            self.store(payload)?;
        }
        Ok(())
    }

    fn list_all(&self) -> StorageResult<FileNames> {
        info!("Loading all files from storage");
        let _guard = self.read_guard();
        let entries = fs::read_dir(&self.root_location).map_err(|e| {
            error!("Failed to read {}: {}", self.root_location.display(), e);
            StorageError::io("Failed to read stored files", e)
        })?;

        Ok(FileNames::new(entries.map(|entry| -> StorageResult<String> {
            let entry = entry.map_err(|e| StorageError::io("Failed to read stored files", e))?;
            entry.file_name().into_string().map_err(|name| {
                warn!("Stored file name is not valid UTF-8: {:?}", name);
                StorageError::io(
                    "Failed to read stored files",
                    io::Error::new(ErrorKind::InvalidData, format!("non UTF-8 file name {:?}", name)),
                )
            })
        })))
    }

    fn resolve_path(&self, filename: &str) -> PathBuf {
        self.root_location.join(filename)
    }

    fn load_as_resource(&self, filename: &str) -> StorageResult<StoredResource> {
        info!("Loading file as resource: {}", filename);
        if !is_legal_filename(filename) {
            debug!("Refusing to resolve filename {:?}", filename);
            return Err(StorageError::not_found(filename));
        }

        let path = self.resolve_path(filename);
        let _guard = self.read_guard();
        let not_found = |e| StorageError::NotFound {
            filename: filename.to_string(),
            source: Some(e),
        };

        let metadata = fs::metadata(&path).map_err(not_found)?;
        if !metadata.is_file() {
            debug!("Resource is not a regular file: {}", filename);
            return Err(StorageError::not_found(filename));
        }
        File::open(&path).map_err(not_found)?;

        debug!("Resource has been found: {}", filename);
        Ok(StoredResource::new(filename, path, metadata.len()))
    }

    fn delete_all(&self) -> StorageResult<()> {
        info!("Deleting all files from storage");
        let _guard = self.write_guard();
        match fs::remove_dir_all(&self.root_location) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to delete {}: {}", self.root_location.display(), e);
                Err(StorageError::io("Failed to delete stored files", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_api::Rejection;
    use tempfile::TempDir;

    /// 创建已初始化的测试存储
    fn create_test_storage() -> (TempDir, FileSystemStorageService) {
        let temp_dir = TempDir::new().unwrap();
        let properties = StorageProperties {
            location: temp_dir.path().join("upload-dir"),
        };
        let storage = FileSystemStorageService::new(&properties);
        storage.initialize().unwrap();
        (temp_dir, storage)
    }

    fn list(storage: &FileSystemStorageService) -> Vec<String> {
        let mut names: Vec<String> = storage
            .list_all()
            .unwrap()
            .collect::<StorageResult<_>>()
            .unwrap();
        names.sort();
        names
    }

    #[test]
    fn test_store_then_load() {
        let (_temp_dir, storage) = create_test_storage();

        storage.store(Payload::new("first.png", b"abc".to_vec())).unwrap();

        assert_eq!(list(&storage), vec!["first.png"]);
        let resource = storage.load_as_resource("first.png").unwrap();
        assert_eq!(resource.filename(), "first.png");
        assert_eq!(resource.size(), 3);
        assert_eq!(resource.read().unwrap(), b"abc");
    }

    #[test]
    fn test_store_rejects_empty_file() {
        let (_temp_dir, storage) = create_test_storage();

        for name in ["test.png", "test.txt"] {
            let err = storage.store(Payload::new(name, Vec::new())).unwrap_err();
            match err {
                StorageError::InvalidInput { reason, filename } => {
                    assert_eq!(reason, Rejection::EmptyFile);
                    assert_eq!(filename, name);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(list(&storage).is_empty());
    }

    #[test]
    fn test_store_rejects_wrong_extension() {
        let (_temp_dir, storage) = create_test_storage();

        // 合法的PNG签名也不能绕过扩展名检查
        let png_signature = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let err = storage
            .store(Payload::new("test.txt", png_signature))
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::InvalidInput { reason: Rejection::WrongExtension, ref filename }
                if filename == "test.txt"
        ));
        assert!(list(&storage).is_empty());
    }

    #[test]
    fn test_store_rejects_path_traversal() {
        let (temp_dir, storage) = create_test_storage();

        let err = storage
            .store(Payload::new("../escape.png", b"abc".to_vec()))
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::InvalidInput { reason: Rejection::IllegalName, .. }
        ));
        assert!(!temp_dir.path().join("escape.png").exists());
    }

    #[test]
    fn test_store_all_stops_at_first_failure() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage
            .store_all(vec![
                Payload::new("empty.png", Vec::new()),
                Payload::new("valid.png", b"abc".to_vec()),
            ])
            .unwrap_err();

        assert!(matches!(
            err,
            StorageError::InvalidInput { reason: Rejection::EmptyFile, .. }
        ));
        assert!(list(&storage).is_empty());
    }

    #[test]
    fn test_store_all_keeps_earlier_files() {
        let (_temp_dir, storage) = create_test_storage();

        let result = storage.store_all(vec![
            Payload::new("first.png", b"abc".to_vec()),
            Payload::new("second.gif", b"def".to_vec()),
            Payload::new("third.png", b"ghi".to_vec()),
        ]);

        assert!(result.is_err());
        assert_eq!(list(&storage), vec!["first.png"]);
    }

    #[test]
    fn test_store_rejects_existing_name() {
        let (_temp_dir, storage) = create_test_storage();

        storage.store(Payload::new("first.png", b"old".to_vec())).unwrap();
        let err = storage
            .store(Payload::new("first.png", b"new".to_vec()))
            .unwrap_err();

        match err {
            StorageError::Io { context, source } => {
                assert_eq!(context, "Failed to store file first.png");
                assert_eq!(source.kind(), ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(list(&storage), vec!["first.png"]);
        assert_eq!(storage.load_as_resource("first.png").unwrap().read().unwrap(), b"old");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_list_reports_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp_dir, storage) = create_test_storage();
        let name = OsStr::from_bytes(b"broken-\xff.png");
        fs::write(storage.root_location().join(name), b"abc").unwrap();

        let err = storage
            .list_all()
            .unwrap()
            .collect::<StorageResult<Vec<_>>>()
            .unwrap_err();
        match err {
            StorageError::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::InvalidData),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.load_as_resource("notExisted.png").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Could not read file: notExisted.png");
    }

    #[test]
    fn test_load_rejects_directories_and_traversal() {
        let (temp_dir, storage) = create_test_storage();
        fs::create_dir(storage.resolve_path("nested")).unwrap();
        fs::write(temp_dir.path().join("outside.png"), b"abc").unwrap();

        assert!(storage.load_as_resource("nested").unwrap_err().is_not_found());
        assert!(storage.load_as_resource("../outside.png").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_is_flat_and_restartable() {
        let (_temp_dir, storage) = create_test_storage();
        storage.store(Payload::new("first.png", b"abc".to_vec())).unwrap();
        storage.store(Payload::new("second.png", b"def".to_vec())).unwrap();
        fs::create_dir(storage.resolve_path("nested")).unwrap();
        fs::write(storage.resolve_path("nested").join("deep.png"), b"x").unwrap();

        assert_eq!(list(&storage), vec!["first.png", "nested", "second.png"]);
        assert_eq!(list(&storage), vec!["first.png", "nested", "second.png"]);
    }

    #[test]
    fn test_list_fails_without_root() {
        let (_temp_dir, storage) = create_test_storage();
        storage.delete_all().unwrap();

        let err = storage.list_all().unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_delete_all_then_initialize() {
        let (_temp_dir, storage) = create_test_storage();
        storage.store(Payload::new("first.png", b"abc".to_vec())).unwrap();

        storage.delete_all().unwrap();
        assert!(!storage.root_location().exists());
        // 重复删除不会失败
        storage.delete_all().unwrap();

        storage.initialize().unwrap();
        assert!(list(&storage).is_empty());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.initialize().unwrap_err();
        match err {
            StorageError::Initialization { path, source } => {
                assert_eq!(path, storage.root_location());
                assert_eq!(source.kind(), ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_initialize_requires_parent() {
        let temp_dir = TempDir::new().unwrap();
        let properties = StorageProperties {
            location: temp_dir.path().join("missing").join("upload-dir"),
        };
        let storage = FileSystemStorageService::new(&properties);

        assert!(matches!(
            storage.initialize(),
            Err(StorageError::Initialization { .. })
        ));
    }

    #[test]
    fn test_resolve_path_does_not_touch_disk() {
        let (_temp_dir, storage) = create_test_storage();

        let path = storage.resolve_path("never-stored.png");
        assert_eq!(path, storage.root_location().join("never-stored.png"));
        assert!(!path.exists());
    }
}
