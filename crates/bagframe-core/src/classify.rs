//! Explicit classification of topics, fields and streams.

use eyre::{Result, ensure};
use serde::Deserialize;

/// Matches a topic, field or stream key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Exact(String),
    Prefix(String),
    Contains(String),
}

impl Pattern {
    pub fn exact(text: impl Into<String>) -> Self {
        Pattern::Exact(text.into())
    }

    pub fn prefix(text: impl Into<String>) -> Self {
        Pattern::Prefix(text.into())
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Pattern::Contains(text.into())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::Exact(pattern) => text == pattern,
            Pattern::Prefix(pattern) => text.starts_with(pattern.as_str()),
            Pattern::Contains(pattern) => text.contains(pattern.as_str()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Pattern::Exact(s) | Pattern::Prefix(s) | Pattern::Contains(s) => s,
        }
    }
}

/// How a flattened field is resampled, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Numeric values, linearly interpolated.
    Continuous,
    /// Values picked by index, never blended.
    Discrete,
    /// Dropped before it reaches any stream.
    Excluded,
}

/// The classification table consulted by the demultiplexer and the
/// alignment engine.
///
/// Missing fields in a configuration file fall back to the defaults,
/// which describe a ZED2 stereo recording with auxiliary eye cameras.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Classifier {
    /// Stream key whose timestamps become the table rows.
    pub reference: String,

    /// Header of the reference value column. The reference key is used
    /// when unset.
    pub reference_column: Option<String>,

    /// Topics carrying encoded images.
    #[serde(deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub image_topics: Vec<Pattern>,

    /// Topics dropped entirely, e.g. camera calibration.
    #[serde(deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub metadata_topics: Vec<Pattern>,

    /// Field keys (without topic) that never become streams.
    #[serde(deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub excluded_fields: Vec<Pattern>,

    /// Full stream keys resampled by index lookup.
    #[serde(deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub discrete_streams: Vec<Pattern>,

    /// Full stream keys left out of the table. Never applies to the
    /// reference stream.
    #[serde(deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize")]
    pub skipped_streams: Vec<Pattern>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            reference: "/zed2/zed_node/left/image_rect_color/compressed/data".to_string(),
            reference_column: Some("zed2".to_string()),
            image_topics: vec![Pattern::contains("image")],
            metadata_topics: vec![Pattern::contains("camera_info")],
            excluded_fields: vec![
                Pattern::contains("header"),
                Pattern::contains("format"),
                Pattern::contains("frame_id"),
            ],
            discrete_streams: vec![Pattern::contains("eye")],
            skipped_streams: vec![Pattern::contains("zed2")],
        }
    }
}

impl Classifier {
    /// Create a classifier with no rules besides the reference key.
    pub fn empty(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            reference_column: None,
            image_topics: vec![],
            metadata_topics: vec![],
            excluded_fields: vec![],
            discrete_streams: vec![],
            skipped_streams: vec![],
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_reference_column(mut self, column: impl Into<String>) -> Self {
        self.reference_column = Some(column.into());
        self
    }

    pub fn with_image_topic(mut self, pattern: Pattern) -> Self {
        self.image_topics.push(pattern);
        self
    }

    pub fn with_metadata_topic(mut self, pattern: Pattern) -> Self {
        self.metadata_topics.push(pattern);
        self
    }

    pub fn with_excluded_field(mut self, pattern: Pattern) -> Self {
        self.excluded_fields.push(pattern);
        self
    }

    pub fn with_discrete_stream(mut self, pattern: Pattern) -> Self {
        self.discrete_streams.push(pattern);
        self
    }

    pub fn with_skipped_stream(mut self, pattern: Pattern) -> Self {
        self.skipped_streams.push(pattern);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.reference.is_empty(),
            "reference stream key cannot be empty"
        );
        if let Some(column) = &self.reference_column {
            ensure!(!column.is_empty(), "reference column name cannot be empty");
        }

        let rules = self
            .image_topics
            .iter()
            .chain(&self.metadata_topics)
            .chain(&self.excluded_fields)
            .chain(&self.discrete_streams)
            .chain(&self.skipped_streams);
        for rule in rules {
            ensure!(
                !rule.as_str().is_empty(),
                "classification pattern {:?} cannot be empty",
                rule
            );
        }

        Ok(())
    }

    pub fn is_image_topic(&self, topic: &str) -> bool {
        self.image_topics.iter().any(|p| p.matches(topic))
    }

    pub fn is_metadata_topic(&self, topic: &str) -> bool {
        self.metadata_topics.iter().any(|p| p.matches(topic))
    }

    pub fn is_reference(&self, key: &str) -> bool {
        key == self.reference
    }

    pub fn reference_column(&self) -> &str {
        self.reference_column.as_deref().unwrap_or(&self.reference)
    }

    /// Whether the stream `key` stays out of the table.
    pub fn is_skipped(&self, key: &str) -> bool {
        !self.is_reference(key) && self.skipped_streams.iter().any(|p| p.matches(key))
    }

    /// Classifies the field `field` of `topic`.
    pub fn field_kind(&self, topic: &str, field: &str) -> StreamKind {
        if self.is_metadata_topic(topic) || self.excluded_fields.iter().any(|p| p.matches(field)) {
            return StreamKind::Excluded;
        }

        self.stream_kind(&stream_key(topic, field))
    }

    /// Classifies a stream that survived demultiplexing.
    pub fn stream_kind(&self, key: &str) -> StreamKind {
        if self.discrete_streams.iter().any(|p| p.matches(key)) {
            StreamKind::Discrete
        } else {
            StreamKind::Continuous
        }
    }
}

/// Joins a topic and a flattened field into a stream key.
pub fn stream_key(topic: &str, field: &str) -> String {
    format!("{topic}/{field}")
}
