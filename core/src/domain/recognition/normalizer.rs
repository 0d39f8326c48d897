use std::sync::Arc;

use serde::de::IgnoredAny;

use crate::domain::recognition::{
    entities::{RawModelItem, RawModelResponse, RecognizedItem},
    errors::NormalizationError,
    value_objects::RecognitionRules,
};

/// Longest prefix of unparseable model output kept for diagnostics.
pub const PARSE_SNIPPET_CHARS: usize = 400;

/// Turns raw model output into a ranked, filtered list of food items.
///
/// Parsing and schema validation are the only fallible steps; everything
/// after them is total.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Arc<RecognitionRules>,
}

impl Normalizer {
    pub fn new(rules: RecognitionRules) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn normalize(&self, raw_text: &str) -> Result<Vec<RecognizedItem>, NormalizationError> {
        // syntax only, numbers are not range-checked here
        serde_json::from_str::<IgnoredAny>(raw_text).map_err(|_| NormalizationError::Parse {
            snippet: raw_text.chars().take(PARSE_SNIPPET_CHARS).collect(),
        })?;

        // serde would also accept a positional array for a struct
        if !raw_text.trim_start().starts_with('{') {
            return Err(NormalizationError::Schema);
        }

        let response: RawModelResponse =
            serde_json::from_str(raw_text).map_err(|_| NormalizationError::Schema)?;

        let mut items: Vec<RecognizedItem> = response
            .items
            .into_iter()
            .map(sanitize)
            .filter(|item| !item.label.is_empty() && !self.rules.is_banned(&item.label))
            .map(|item| self.canonicalize(item))
            .collect();

        // sort_by is stable, equal confidences keep their input order
        items.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        items.truncate(self.rules.max_items);

        Ok(items)
    }

    fn canonicalize(&self, mut item: RecognizedItem) -> RecognizedItem {
        if item.canonical.is_empty() {
            item.canonical = item.label.clone();
        }

        for rule in &self.rules.canonical_rules {
            if rule.matches(&item.label) {
                item.canonical = rule.canonical().to_string();
            }
        }

        item
    }
}

fn sanitize(raw: RawModelItem) -> RecognizedItem {
    RecognizedItem {
        label: raw.label.trim().to_lowercase(),
        canonical: raw.canonical.trim().to_lowercase(),
        confidence: clamp_confidence(raw.confidence),
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }

    let clamped = confidence.clamp(0.0, 1.0);
    // fold -0.0 so it neither sorts below 0.0 nor serializes with a sign
    if clamped == 0.0 { 0.0 } else { clamped }
}
