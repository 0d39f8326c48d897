use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use super::handlers::recognize_image::recognize_image;
use crate::application::{
    auth::auth, http::server::app_state::AppState, rate_limit::rate_limit,
};

/// Room for multipart boundaries and headers on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn recognition_routes(state: AppState) -> Router<AppState> {
    let body_limit = state.args.server.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route(
            &format!("{}/recognize", state.args.server.root_path),
            post(recognize_image),
        )
        // layers run bottom-up: rate limit first, then auth
        .layer(middleware::from_fn_with_state(state.clone(), auth))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(body_limit))
}
