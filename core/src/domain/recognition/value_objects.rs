use std::collections::BTreeSet;

use regex::Regex;

pub const MAX_RECOGNIZED_ITEMS: usize = 5;

pub const BANNED_TERMS: [&str; 7] = [
    "snack",
    "food",
    "meal",
    "dish",
    "appetizer",
    "plate",
    "junk food",
];

/// Overwrites an item's canonical name when its label matches `pattern`.
#[derive(Debug, Clone)]
pub struct CanonicalRule {
    pattern: Regex,
    canonical: String,
}

impl CanonicalRule {
    pub fn new(pattern: &str, canonical: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            canonical: canonical.to_string(),
        })
    }

    pub fn matches(&self, label: &str) -> bool {
        self.pattern.is_match(label)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// Tables consulted by the normalizer.
///
/// `canonical_rules` are applied in order and the last matching rule wins, so
/// the order is part of the semantics.
#[derive(Debug, Clone)]
pub struct RecognitionRules {
    pub banned_terms: BTreeSet<String>,
    pub canonical_rules: Vec<CanonicalRule>,
    pub max_items: usize,
}

impl RecognitionRules {
    /// The built-in tables. Any rule that fails to compile is an error, since
    /// dropping one would change which rule wins.
    pub fn builtin() -> Result<Self, regex::Error> {
        let canonical_rules = [
            (
                r"\b(spaghetti|penne|fusilli|farfalle|macaroni|rigatoni|tagliatelle|linguine|fettuccine|pasta|noodles?)\b",
                "pasta",
            ),
            (r"\b(french fries|fries)\b", "french fries"),
            (r"\b(orange|mandarin|tangerine)s?\b", "orange"),
        ]
        .into_iter()
        .map(|(pattern, canonical)| CanonicalRule::new(pattern, canonical))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            banned_terms: BANNED_TERMS.iter().map(|term| term.to_string()).collect(),
            canonical_rules,
            max_items: MAX_RECOGNIZED_ITEMS,
        })
    }

    pub fn is_banned(&self, label: &str) -> bool {
        self.banned_terms.contains(label)
    }
}

#[derive(Debug, Clone)]
pub struct RecognizeImageInput {
    pub image_data: Vec<u8>,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_are_all_compiled() {
        let rules = RecognitionRules::builtin().unwrap();
        assert_eq!(rules.canonical_rules.len(), 3);
        assert_eq!(rules.max_items, 5);
    }

    #[test]
    fn test_banned_terms_lookup() {
        let rules = RecognitionRules::builtin().unwrap();
        assert!(rules.is_banned("junk food"));
        assert!(rules.is_banned("plate"));
        assert!(!rules.is_banned("apple"));
    }

    #[test]
    fn test_pasta_rule_requires_word_match() {
        let rules = RecognitionRules::builtin().unwrap();
        let pasta = &rules.canonical_rules[0];
        assert!(pasta.matches("penne arrabbiata"));
        assert!(pasta.matches("ramen noodles"));
        assert!(!pasta.matches("antipasta"));
        assert_eq!(pasta.canonical(), "pasta");
    }

    #[test]
    fn test_builtin_rules_keep_their_order() {
        let rules = RecognitionRules::builtin().unwrap();
        let canonicals: Vec<&str> = rules.canonical_rules.iter().map(|r| r.canonical()).collect();
        assert_eq!(canonicals, vec!["pasta", "french fries", "orange"]);
    }

    #[test]
    fn test_invalid_rule_pattern_is_rejected() {
        assert!(CanonicalRule::new(r"(unclosed", "x").is_err());
    }
}
