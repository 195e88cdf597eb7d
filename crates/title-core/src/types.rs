use serde::{Deserialize, Serialize};

/// Rewriting strategy applied to every title in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationMode {
    /// Same subject and concepts, only the wording changes.
    Synonyms,
    /// Same subject, different scenarios and angles within the niche.
    SameNiche,
    /// The subject is swapped for other markets.
    DifferentNiches,
}

impl VariationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationMode::Synonyms => "synonyms",
            VariationMode::SameNiche => "same_niche",
            VariationMode::DifferentNiches => "different_niches",
        }
    }
}

/// Optional knobs supplied alongside a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// User-supplied niche label; skips auto-detection for `same_niche` runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_niche: Option<String>,
    /// Desired destination niche for `different_niches` runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_niche: Option<String>,
}

/// Per-title record observed by the rendering side.
///
/// Created loading when a run starts, settled exactly once when the chunk
/// containing the title settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleResult {
    pub original_title: String,
    pub variations: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl TitleResult {
    /// Record for a title whose chunk has not settled yet.
    pub fn pending(original_title: impl Into<String>) -> Self {
        Self {
            original_title: original_title.into(),
            variations: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&VariationMode::SameNiche).unwrap();
        assert_eq!(json, r#""same_niche""#);
        let back: VariationMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VariationMode::SameNiche);
    }

    #[test]
    fn pending_record_is_loading_without_error() {
        let record = TitleResult::pending("How to bake bread");
        assert_eq!(record.original_title, "How to bake bread");
        assert!(record.is_loading);
        assert!(record.variations.is_empty());
        assert!(record.error.is_none());
    }

    #[test]
    fn title_result_serializes_camel_case() {
        let record = TitleResult::pending("x");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("originalTitle"));
        assert!(json.contains("isLoading"));
    }
}
