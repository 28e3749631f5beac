pub mod app_state;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod routes;
pub mod view;

pub use app_state::AppState;
pub use error::WebError;
pub use handlers::*;
pub use routes::routes;
