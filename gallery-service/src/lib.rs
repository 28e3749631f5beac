pub mod gallery;

pub use gallery::{
    DefaultGalleryService, GalleryModel, GalleryService, GallerySettings, GalleryView,
};
