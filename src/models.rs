//! Core data models used throughout the engine.
//!
//! These types represent the chunks, extracted conditions, and test-case
//! records that flow through the indexing and generation pipeline.

use serde::{Deserialize, Serialize};

/// Source metadata attached to every chunk by the chunker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_name: String,
    pub chunk_id: usize,
    pub source: String,
}

/// A bounded span of document text. The embedding is attached by
/// [`crate::embedding::embed_chunks`] and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
            embedding: None,
        }
    }
}

/// One ranked result from [`crate::index::EmbeddingIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Squared L2 distance; smaller is closer.
    pub distance: f32,
}

/// A `(field, value)` pair lexically extracted from a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: String,
    /// The matched span, or the whole sentence for synthetic conditions.
    pub original: String,
}

/// Three-level classification label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub major: String,
    pub medium: String,
    pub minor: String,
}

impl Category {
    pub fn new(
        major: impl Into<String>,
        medium: impl Into<String>,
        minor: impl Into<String>,
    ) -> Self {
        Self {
            major: major.into(),
            medium: medium.into(),
            minor: minor.into(),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new("시스템", "기능", "세부 기능")
    }
}

/// Per-platform result columns. Always emitted empty by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformResults {
    #[serde(rename = "AD")]
    pub ad: String,
    #[serde(rename = "iOS")]
    pub ios: String,
    #[serde(rename = "PC")]
    pub pc: String,
}

impl PlatformResults {
    /// True when any platform column equals `status`.
    pub fn any_is(&self, status: &str) -> bool {
        [&self.ad, &self.ios, &self.pc]
            .iter()
            .any(|value| value.as_str() == status)
    }

    pub fn filled(&self) -> usize {
        [&self.ad, &self.ios, &self.pc]
            .iter()
            .filter(|value| !value.is_empty())
            .count()
    }
}

/// The structured output unit consumed by the report exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub major: String,
    pub medium: String,
    pub minor: String,
    pub content: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub jira: String,
    #[serde(default)]
    pub platform_results: PlatformResults,
    #[serde(default)]
    pub note: String,
}

impl TestCase {
    pub fn new(category: &Category, content: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            major: category.major.clone(),
            medium: category.medium.clone(),
            minor: category.minor.clone(),
            content: content.into(),
            result: String::new(),
            jira: String::new(),
            platform_results: PlatformResults::default(),
            note: note.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testcase_serializes_platform_columns_by_display_name() {
        let tc = TestCase::new(&Category::default(), "버튼 노출 확인", "");
        let json = serde_json::to_value(&tc).unwrap();
        assert_eq!(json["platform_results"]["AD"], "");
        assert_eq!(json["platform_results"]["iOS"], "");
        assert_eq!(json["major"], "시스템");
    }

    #[test]
    fn platform_status_helpers() {
        let results = PlatformResults {
            ad: "PASS".into(),
            ios: String::new(),
            pc: "FAIL".into(),
        };
        assert!(results.any_is("PASS"));
        assert!(results.any_is("FAIL"));
        assert!(!results.any_is("BLOCKED"));
        assert_eq!(results.filled(), 2);
    }
}
