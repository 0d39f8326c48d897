use foodlens_core::domain::recognition::entities::RecognizedItem;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RecognizeImageResponse {
    pub items: Vec<RecognizedItem>,
}

/// Multipart body accepted by `POST /recognize`, for the OpenAPI document
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct RecognizeImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
