pub mod storage;

pub use storage::{
    FileNames, Payload, Rejection, StorageError, StorageResult, StorageService, StoredResource,
};
