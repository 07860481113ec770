//! This library resamples the streams of a recorded sensor log onto the
//! timestamps of one reference stream and assembles them into a single
//! table, extracting embedded images to side files.
//!
//! # Usage
//!
//! ```rust
//! use bagframe_core::{
//!     Classifier, Config, FieldWriter, Flatten, MemorySource, Pattern, TimestampMode, convert,
//! };
//!
//! // Define your message type
//! #[derive(Clone)]
//! struct Reading {
//!     secs: u32,
//!     nsecs: u32,
//!     value: f64,
//! }
//!
//! impl Flatten for Reading {
//!     fn flatten_into(&self, out: &mut FieldWriter<'_>) {
//!         out.scope("header/stamp", |out| {
//!             out.int("secs", self.secs).int("nsecs", self.nsecs);
//!         });
//!         out.float("value", self.value);
//!     }
//! }
//!
//! # fn main() -> eyre::Result<()> {
//! let reading = |secs, value| Reading { secs, nsecs: 0, value };
//!
//! // The reference stream defines the rows, the other stream is
//! // interpolated at its timestamps.
//! let mut source = MemorySource::new();
//! source
//!     .push("/clock", "demo/Reading", 0.0, reading(0, 0.0))
//!     .push("/sensor", "demo/Reading", 0.0, reading(0, 10.0))
//!     .push("/clock", "demo/Reading", 1.0, reading(1, 0.0))
//!     .push("/clock", "demo/Reading", 2.0, reading(2, 0.0))
//!     .push("/sensor", "demo/Reading", 2.0, reading(2, 20.0));
//!
//! let output = tempfile::tempdir()?;
//! let classifier = Classifier::empty("/clock/value")
//!     .with_excluded_field(Pattern::contains("header"));
//! let config = Config::new(output.path())
//!     .with_classifier(classifier)
//!     .with_timestamp_mode(TimestampMode::Exact);
//!
//! let summary = convert(&mut source, &config)?;
//! assert_eq!(summary.rows, 3);
//!
//! let table = std::fs::read_to_string(summary.table_path)?;
//! assert!(table.contains("1,1.0,0.0,15.0"));
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod classify;
mod config;
mod convert;
pub mod demux;
mod error;
pub mod interp;
pub mod payload;
pub mod series;
mod source;
pub mod table;
mod timestamp;
pub mod topics;
mod types;

pub use classify::{Classifier, Pattern, StreamKind};
pub use config::{Config, DEFAULT_TABLE_NAME};
pub use convert::{Summary, convert};
pub use error::Error;
pub use series::Series;
pub use source::MemorySource;
pub use table::Table;
pub use timestamp::TimestampMode;
pub use types::*;
