use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Image payload is missing or empty")]
    InvalidImage,

    #[error("Model returned malformed JSON")]
    ModelParse { snippet: String },

    #[error("Model returned JSON with an unexpected shape")]
    ModelSchema,

    #[error("Upstream did not answer within {0} ms")]
    UpstreamTimeout(u64),

    #[error("Upstream service error: {0}")]
    UpstreamFailure(String),
}
