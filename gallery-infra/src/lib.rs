pub mod storage;
pub mod template;

pub use storage::{FileSystemStorageService, FileTypeValidator, StorageProperties};
pub use template::{TemplateContext, TemplateRenderer, TeraTemplateEngine};
