use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::value::RawValue;
use utoipa::ToSchema;

/// A food item detected in an uploaded image, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecognizedItem {
    /// Lowercased, trimmed label as reported by the model
    pub label: String,
    /// Lowercased, trimmed lookup key for the item
    pub canonical: String,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
}

/// Top-level shape the model is asked to produce.
///
/// Unknown top-level keys are rejected; unknown keys inside an item are not.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawModelResponse {
    pub items: Vec<RawModelItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawModelItem {
    pub label: String,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: f64,
    pub canonical: String,
}

/// Reads a JSON number without serde_json's range check, so `1e400` comes out
/// as infinity instead of failing the whole document.
fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = raw.get();

    let is_number = text.starts_with(|c: char| c == '-' || c.is_ascii_digit());
    match text.parse::<f64>() {
        Ok(value) if is_number => Ok(value),
        _ => Err(de::Error::custom(format!("expected a number, found {}", text))),
    }
}
