//! Configuration file parsing and merging with the command line.

use crate::cli::ConvertArgs;
use bagframe_core::{Classifier, TimestampMode, topics::topics_from_keys};
use eyre::{Result, WrapErr, bail, ensure};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory.
    pub output: Option<PathBuf>,

    /// File name of the table inside the output directory.
    pub table_name: Option<String>,

    /// Topics to keep.
    pub include: Option<Vec<String>>,

    /// Topics to drop when `include` is not given.
    pub exclude: Option<Vec<String>>,

    /// Field keys to keep; their owning topics are included.
    pub keys: Option<Vec<String>>,

    pub timestamp_mode: TimestampMode,

    /// Topic, field and stream classification. Unspecified tables keep
    /// their defaults.
    pub classifier: Classifier,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        for (name, topics) in [
            ("include", &self.include),
            ("exclude", &self.exclude),
            ("keys", &self.keys),
        ] {
            if let Some(topics) = topics {
                for (i, topic) in topics.iter().enumerate() {
                    ensure!(!topic.is_empty(), "{name} entry at index {i} cannot be empty");
                }
            }
        }

        if let Some(table_name) = &self.table_name {
            ensure!(!table_name.is_empty(), "table_name cannot be empty");
        }

        self.classifier.validate()
    }

    /// Apply command line overrides and convert to a bagframe-core Config.
    ///
    /// Command line lists replace the lists of the file. Field keys are
    /// turned into topics and added to the included topics.
    pub fn to_convert_config(mut self, args: &ConvertArgs) -> Result<bagframe_core::Config> {
        if let Some(output) = &args.output {
            self.output = Some(output.clone());
        }
        if let Some(table_name) = &args.table_name {
            self.table_name = Some(table_name.clone());
        }
        if !args.include.is_empty() {
            self.include = Some(args.include.clone());
        }
        if !args.exclude.is_empty() {
            self.exclude = Some(args.exclude.clone());
        }
        if !args.keys.is_empty() {
            self.keys = Some(args.keys.clone());
        }
        if let Some(reference) = &args.reference {
            self.classifier.reference = reference.clone();
            self.classifier.reference_column = None;
        }
        if let Some(column) = &args.reference_column {
            self.classifier.reference_column = Some(column.clone());
        }
        if args.exact_timestamps {
            self.timestamp_mode = TimestampMode::Exact;
        }

        let Some(output) = self.output else {
            bail!("An output directory is required (--output or `output` in the config file)");
        };

        let include = match (self.include, self.keys) {
            (include, None) => include,
            (include, Some(keys)) => {
                let mut topics = include.unwrap_or_default();
                for topic in topics_from_keys(&keys) {
                    if !topics.contains(&topic) {
                        topics.push(topic);
                    }
                }
                Some(topics)
            }
        };

        let mut config = bagframe_core::Config::new(output)
            .with_classifier(self.classifier)
            .with_timestamp_mode(self.timestamp_mode);
        if let Some(table_name) = self.table_name {
            config = config.with_table_name(table_name);
        }
        config.include = include;
        config.exclude = self.exclude;

        config.validate()?;
        Ok(config)
    }
}
