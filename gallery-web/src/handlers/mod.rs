pub mod photos;
pub mod static_resources;

pub use photos::*;
pub use static_resources::*;
