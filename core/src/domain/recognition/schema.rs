use serde_json::json;

/// Instruction sent alongside the uploaded image.
pub const RECOGNITION_PROMPT: &str = "Identify the distinct food items visible in this image. \
For each item return a short specific label, a canonical name usable as a nutrition database \
lookup key, and your confidence between 0 and 1. Avoid vague labels such as \"food\", \"meal\" \
or \"snack\". Return at most 5 items, most confident first. If no food is visible, return an \
empty list.";

/// Returns the JSON schema for recognition LLM responses
pub fn get_recognition_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "label": { "type": "string" },
                        "confidence": { "type": "number" },
                        "canonical": { "type": "string" }
                    },
                    "required": ["label", "confidence", "canonical"]
                }
            }
        },
        "required": ["items"]
    })
}
