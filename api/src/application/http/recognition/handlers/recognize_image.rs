use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use foodlens_core::domain::recognition::{
    ports::RecognitionService, value_objects::RecognizeImageInput,
};
use tracing::{error, warn};

use crate::application::http::{
    recognition::validators::{RecognizeImageForm, RecognizeImageResponse},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

fn too_large(max_upload_bytes: usize) -> ApiError {
    ApiError::PayloadTooLarge(format!(
        "Image too large. Max size is {} bytes",
        max_upload_bytes
    ))
}

/// Body-limit rejections surface as multipart errors; keep them as 413
fn multipart_error(e: MultipartError, max_upload_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_upload_bytes);
    }

    error!("Failed to read multipart body: {}", e);
    ApiError::BadRequest(format!("Failed to read multipart body: {}", e))
}

#[utoipa::path(
    post,
    path = "/recognize",
    tag = "recognition",
    summary = "Recognize food in an image",
    description = "Sends the uploaded image to the vision model and returns at most five normalized food items, most confident first.",
    request_body(content = RecognizeImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = RecognizeImageResponse),
        (status = 400, description = "Missing, empty or non-image upload", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiErrorResponse),
        (status = 413, description = "Image too large", body = ApiErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ApiErrorResponse),
        (status = 502, description = "Upstream failed or returned unusable output", body = ApiErrorResponse),
        (status = 504, description = "Upstream timed out", body = ApiErrorResponse)
    ),
)]
pub async fn recognize_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<RecognizeImageResponse>, ApiError> {
    let max_upload_bytes = state.args.server.max_upload_bytes;
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name != "image" {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|c| c.to_string())
            .unwrap_or_default();

        if !mime_type.starts_with("image/") {
            return Err(ApiError::BadRequest(format!(
                "Unsupported content type '{}', expected an image",
                mime_type
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_bytes))?;

        if data.is_empty() {
            warn!("Empty image upload attempted");
            return Err(ApiError::BadRequest("Image cannot be empty".to_string()));
        }

        if data.len() > max_upload_bytes {
            return Err(too_large(max_upload_bytes));
        }

        image = Some((data.to_vec(), mime_type));
    }

    let (image_data, mime_type) =
        image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;

    let items = state
        .service
        .recognize_food(RecognizeImageInput {
            image_data,
            mime_type: mime_type.clone(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, mime_type = %mime_type, "Failed to recognize image");
            ApiError::from(e)
        })?;

    Ok(Response::OK(RecognizeImageResponse { items }))
}
