use std::time::Instant;

use tracing::instrument;

use crate::domain::{
    common::{deadline::with_deadline, entities::app_errors::CoreError, services::Service},
    recognition::{
        entities::RecognizedItem,
        ports::{RecognitionService, VisionClient},
        schema::{RECOGNITION_PROMPT, get_recognition_schema},
        value_objects::RecognizeImageInput,
    },
};

impl<V> RecognitionService for Service<V>
where
    V: VisionClient,
{
    #[instrument(
        skip(self, input),
        fields(image_bytes = input.image_data.len(), mime_type = %input.mime_type)
    )]
    async fn recognize_food(
        &self,
        input: RecognizeImageInput,
    ) -> Result<Vec<RecognizedItem>, CoreError> {
        if input.image_data.is_empty() {
            return Err(CoreError::InvalidImage);
        }

        let started = Instant::now();

        // 1. Ask the model, bounded by the upstream deadline
        let raw_response = with_deadline(
            self.upstream_timeout,
            self.vision_client.generate_with_image(
                RECOGNITION_PROMPT.to_string(),
                input.image_data,
                input.mime_type,
                get_recognition_schema(),
            ),
        )
        .await?;

        // 2. Normalize the untrusted answer
        let items = self.normalizer.normalize(&raw_response).map_err(|e| {
            tracing::warn!(
                error = %e,
                response_chars = raw_response.chars().count(),
                "Rejected model output"
            );
            CoreError::from(e)
        })?;

        tracing::info!(
            items = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recognized food items"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use super::*;
    use crate::domain::recognition::{normalizer::Normalizer, value_objects::RecognitionRules};

    struct StubVisionClient {
        replies: Mutex<VecDeque<Result<String, CoreError>>>,
        delay: Duration,
        calls: AtomicUsize,
        last_mime_type: Mutex<Option<String>>,
    }

    impl StubVisionClient {
        fn new(replies: Vec<Result<String, CoreError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_mime_type: Mutex::new(None),
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl VisionClient for StubVisionClient {
        async fn generate_with_image(
            &self,
            _prompt: String,
            _image_data: Vec<u8>,
            mime_type: String,
            _response_schema: serde_json::Value,
        ) -> Result<String, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_mime_type.lock().unwrap() = Some(mime_type);
            tokio::time::sleep(self.delay).await;
            let reply = self.replies.lock().unwrap().pop_front();
            reply.unwrap_or_else(|| Ok(r#"{"items":[]}"#.to_string()))
        }
    }

    fn input() -> RecognizeImageInput {
        RecognizeImageInput {
            image_data: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn service(client: StubVisionClient, timeout: Duration) -> Service<StubVisionClient> {
        Service::new(
            client,
            Normalizer::new(RecognitionRules::builtin().unwrap()),
            timeout,
        )
    }

    #[tokio::test]
    async fn test_recognize_food_normalizes_model_output() {
        let client = StubVisionClient::new(vec![Ok(r#"{"items":[
            {"label":"Rigatoni","confidence":0.4,"canonical":""},
            {"label":"meal","confidence":0.99,"canonical":"meal"},
            {"label":"Tangerine","confidence":0.8,"canonical":"tangerine"}
        ]}"#
        .to_string())]);
        let service = service(client, Duration::from_secs(1));

        let items = service.recognize_food(input()).await.unwrap();

        assert_eq!(
            items,
            vec![
                RecognizedItem {
                    label: "tangerine".to_string(),
                    canonical: "orange".to_string(),
                    confidence: 0.8,
                },
                RecognizedItem {
                    label: "rigatoni".to_string(),
                    canonical: "pasta".to_string(),
                    confidence: 0.4,
                },
            ]
        );
        assert_eq!(
            service.vision_client.last_mime_type.lock().unwrap().as_deref(),
            Some("image/jpeg")
        );
    }

    #[tokio::test]
    async fn test_recognize_food_rejects_empty_image() {
        let service = service(StubVisionClient::new(vec![]), Duration::from_secs(1));

        let result = service
            .recognize_food(RecognizeImageInput {
                image_data: vec![],
                mime_type: "image/png".to_string(),
            })
            .await;

        assert_eq!(result, Err(CoreError::InvalidImage));
        assert_eq!(service.vision_client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recognize_food_times_out() {
        let client = StubVisionClient::new(vec![]).slow(Duration::from_millis(500));

        let result = service(client, Duration::from_millis(20))
            .recognize_food(input())
            .await;

        assert_eq!(result, Err(CoreError::UpstreamTimeout(20)));
    }

    #[tokio::test]
    async fn test_recognize_food_propagates_upstream_failure() {
        let client = StubVisionClient::new(vec![Err(CoreError::UpstreamFailure(
            "403 Forbidden".to_string(),
        ))]);

        let result = service(client, Duration::from_secs(1))
            .recognize_food(input())
            .await;

        assert_eq!(
            result,
            Err(CoreError::UpstreamFailure("403 Forbidden".to_string()))
        );
    }

    #[tokio::test]
    async fn test_recognize_food_classifies_bad_model_output() {
        let client = StubVisionClient::new(vec![
            Ok("Sorry, I cannot help with that.".to_string()),
            Ok(r#"{"dishes":[]}"#.to_string()),
        ]);
        let service = service(client, Duration::from_secs(1));

        assert_eq!(
            service.recognize_food(input()).await,
            Err(CoreError::ModelParse {
                snippet: "Sorry, I cannot help with that.".to_string()
            })
        );
        assert_eq!(
            service.recognize_food(input()).await,
            Err(CoreError::ModelSchema)
        );
    }
}
