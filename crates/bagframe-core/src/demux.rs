use crate::{
    classify::{Classifier, StreamKind, stream_key},
    error::Error,
    payload::ImageSink,
    series::Series,
    timestamp::TimestampMode,
    types::{FieldMap, FieldValue, Flatten, Value},
};
use eyre::Result;
use indexmap::IndexMap;
use tracing::{debug, warn};

pub const STAMP_SECS_FIELD: &str = "header/stamp/secs";
pub const STAMP_NSECS_FIELD: &str = "header/stamp/nsecs";

/// Splits flattened messages into one [Series] per stream key.
///
/// Binary fields of image topics are handed to the [ImageSink] and the
/// returned path is stored in their place.
#[derive(Debug)]
pub struct Demultiplexer<'a> {
    classifier: &'a Classifier,
    timestamp_mode: TimestampMode,
    streams: IndexMap<String, Series>,
    records: usize,
}

impl<'a> Demultiplexer<'a> {
    pub fn new(classifier: &'a Classifier, timestamp_mode: TimestampMode) -> Self {
        Self {
            classifier,
            timestamp_mode,
            streams: IndexMap::new(),
            records: 0,
        }
    }

    /// Number of records consumed so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn streams(&self) -> &IndexMap<String, Series> {
        &self.streams
    }

    pub fn finish(self) -> IndexMap<String, Series> {
        debug!(
            records = self.records,
            streams = self.streams.len(),
            "Demultiplexing finished"
        );
        self.streams
    }

    /// Appends every retained field of `message` to its stream.
    pub fn push<M>(&mut self, topic: &str, message: &M, images: &mut ImageSink) -> Result<()>
    where
        M: Flatten + ?Sized,
    {
        self.records += 1;

        if self.classifier.is_metadata_topic(topic) {
            return Ok(());
        }

        let fields = message.flatten();
        let timestamp = self.header_timestamp(topic, &fields)?;
        let is_image_topic = self.classifier.is_image_topic(topic);

        for (field, value) in fields {
            if self.classifier.field_kind(topic, &field) == StreamKind::Excluded {
                continue;
            }

            let key = stream_key(topic, &field);
            let value = match value {
                FieldValue::Int(value) => Value::Number(value as f64),
                FieldValue::Float(value) => Value::Number(value),
                FieldValue::Text(text) => Value::Text(text),
                FieldValue::Bytes(bytes) if is_image_topic => {
                    Value::Text(images.store(topic, &bytes)?)
                }
                FieldValue::Bytes(_) => return Err(Error::BinaryPayload { key }.into()),
            };

            let series = self.streams.entry(key).or_insert_with_key(|key| {
                debug!(stream = %key, "New stream");
                Series::new()
            });

            // First regression per stream only.
            if !series.push(timestamp, value) && series.regressions() == 1 {
                warn!(
                    topic = %topic,
                    field = %field,
                    timestamp,
                    "Timestamp went backwards, interpolation uses sorted samples"
                );
            }
        }

        Ok(())
    }

    fn header_timestamp(&self, topic: &str, fields: &FieldMap) -> Result<f64> {
        let secs = stamp_field(topic, fields, STAMP_SECS_FIELD)?;
        let nsecs = stamp_field(topic, fields, STAMP_NSECS_FIELD)?;
        self.timestamp_mode.to_seconds(secs, nsecs)
    }
}

fn stamp_field(topic: &str, fields: &FieldMap, field: &'static str) -> Result<i64> {
    match fields.get(field) {
        Some(FieldValue::Int(value)) => Ok(*value),
        _ => Err(Error::MissingHeaderStamp {
            topic: topic.to_string(),
            field,
        }
        .into()),
    }
}
