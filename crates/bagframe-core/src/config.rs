use crate::{classify::Classifier, timestamp::TimestampMode};
use eyre::{Result, ensure};
use std::path::PathBuf;

/// Configuration parameters that are passed to [convert](crate::convert()).
#[derive(Debug, Clone)]
pub struct Config {
    /// Topics to keep. Takes precedence over `exclude`.
    pub include: Option<Vec<String>>,
    /// Topics to drop when `include` is not given.
    pub exclude: Option<Vec<String>>,
    /// Directory receiving `images/` and the table.
    pub output: PathBuf,
    /// File name of the table inside `output`.
    pub table_name: String,
    /// Topic, field and stream classification.
    pub classifier: Classifier,
    /// Header stamp conversion.
    pub timestamp_mode: TimestampMode,
}

pub const DEFAULT_TABLE_NAME: &str = "data.csv";

impl Config {
    /// Create a Config keeping every topic with the default classifier.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            include: None,
            exclude: None,
            output: output.into(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            classifier: Classifier::default(),
            timestamp_mode: TimestampMode::default(),
        }
    }

    pub fn with_include<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(topics.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_exclude<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(topics.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_timestamp_mode(mut self, timestamp_mode: TimestampMode) -> Self {
        self.timestamp_mode = timestamp_mode;
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Path of the output table.
    pub fn table_path(&self) -> PathBuf {
        self.output.join(&self.table_name)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.output.as_os_str().is_empty(),
            "output directory cannot be empty"
        );
        ensure!(!self.table_name.is_empty(), "table name cannot be empty");
        ensure!(
            !self.table_name.contains(['/', '\\']),
            "table name `{}` must be a plain file name",
            self.table_name
        );
        self.classifier.validate()
    }
}
