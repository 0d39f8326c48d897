use thiserror::Error;

use crate::domain::common::entities::app_errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Model output is not valid JSON")]
    Parse { snippet: String },

    #[error("Model output does not match the expected schema")]
    Schema,
}

impl From<NormalizationError> for CoreError {
    fn from(error: NormalizationError) -> Self {
        match error {
            NormalizationError::Parse { snippet } => CoreError::ModelParse { snippet },
            NormalizationError::Schema => CoreError::ModelSchema,
        }
    }
}
