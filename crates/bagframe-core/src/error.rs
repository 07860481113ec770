use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions reported by a conversion run.
///
/// Every function in this crate returns [eyre::Result]. These errors are
/// raised into the report and can be recovered with
/// `report.downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no topics in the recording")]
    NoStreams,

    #[error("no topics left after filtering")]
    NoStreamsAfterFilter,

    #[error("reference stream `{key}` has no samples")]
    MissingReferenceStream { key: String },

    #[error("stream `{key}` has {count} sample(s), at least {required} are required")]
    InsufficientSamples {
        key: String,
        count: usize,
        required: usize,
    },

    #[error("failed to decode image payload #{index} on `{topic}`")]
    PayloadDecode {
        topic: String,
        index: usize,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("stream `{key}` holds a non-numeric value at sample {index}")]
    NonNumericValue { key: String, index: usize },

    #[error("binary field `{key}` found outside an image topic")]
    BinaryPayload { key: String },

    #[error("message on `{topic}` has no header stamp field `{field}`")]
    MissingHeaderStamp { topic: String, field: &'static str },

    #[error("cannot build a timestamp from `{text}`")]
    InvalidTimestamp {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("column `{key}` has {actual} rows, expected {expected}")]
    ColumnLength {
        key: String,
        expected: usize,
        actual: usize,
    },
}
