use crate::{
    domain::{
        common::{FoodlensConfig, services::Service},
        recognition::{normalizer::Normalizer, value_objects::RecognitionRules},
    },
    infrastructure::llm::GeminiVisionClient,
};

pub type FoodlensService = Service<GeminiVisionClient>;

pub fn create_service(config: FoodlensConfig) -> Result<FoodlensService, anyhow::Error> {
    let vision_client = GeminiVisionClient::new(
        config.llm.gemini_api_key,
        config.llm.gemini_model,
        config.llm.gemini_base_url,
    )?;

    let normalizer = Normalizer::new(RecognitionRules::builtin()?);

    Ok(Service::new(
        vision_client,
        normalizer,
        config.llm.upstream_timeout,
    ))
}
