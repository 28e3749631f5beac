use crate::handlers::{
    change_background, get_pictures_with_original_size, get_upload_form, handle_file_upload,
    list_uploaded_files, reset_storage, serve_file, serve_stylesheet, set_picture_size,
    set_row_numbers,
};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// 画廊路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/photo", get(get_upload_form).post(handle_file_upload))
        .route("/photo/reset", post(reset_storage))
        .route("/photo/gallery", get(list_uploaded_files))
        .route("/photo/blackbackground", get(change_background))
        .route("/photo/row/:row_number", get(set_row_numbers))
        .route("/photo/wh/:wh", get(set_picture_size))
        .route("/photo/original", get(get_pictures_with_original_size))
        .route("/photo/files/:filename", get(serve_file))
        .route("/css/:name", get(serve_stylesheet))
}
