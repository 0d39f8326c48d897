use crate::application::http::{health, recognition::handlers::recognize_image};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodlens API"
    ),
    paths(
        recognize_image::recognize_image,
        health::health,
    )
)]
pub struct ApiDoc;
