use crate::error::Error;
use eyre::Result;
use serde::Deserialize;

/// How header `secs`/`nsecs` become float seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampMode {
    /// Parse the text `"<secs>.<nsecs>"` as one number.
    ///
    /// Tables produced by earlier tooling were built this way, so it
    /// remains the default. Nanoseconds are not zero padded:
    /// `(1, 5)` becomes `1.5` rather than `1.000000005`.
    #[default]
    Concatenated,
    /// `secs + nsecs * 1e-9`.
    Exact,
}

impl TimestampMode {
    pub fn to_seconds(self, secs: i64, nsecs: i64) -> Result<f64> {
        match self {
            TimestampMode::Concatenated => {
                let text = format!("{secs}.{nsecs}");
                let value = text
                    .parse::<f64>()
                    .map_err(|source| Error::InvalidTimestamp { text, source })?;
                Ok(value)
            }
            TimestampMode::Exact => Ok(secs as f64 + nsecs as f64 * 1e-9),
        }
    }
}
