use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recognition::{entities::RecognizedItem, value_objects::RecognizeImageInput},
};

/// Vision-capable model client
pub trait VisionClient: Send + Sync {
    fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for image recognition
pub trait RecognitionService: Send + Sync {
    fn recognize_food(
        &self,
        input: RecognizeImageInput,
    ) -> impl Future<Output = Result<Vec<RecognizedItem>, CoreError>> + Send;
}
