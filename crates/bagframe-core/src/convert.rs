use crate::{
    Config,
    align::align,
    demux::Demultiplexer,
    error::Error,
    payload::ImageSink,
    table::Table,
    topics::filter_topics,
    types::RecordSource,
};
use eyre::Result;
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a successful [convert] run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Topics read from the recording.
    pub topics: Vec<String>,
    /// Messages consumed.
    pub records: usize,
    /// Rows in the table, one per reference sample.
    pub rows: usize,
    /// Columns in the table, including the timestamp.
    pub columns: usize,
    /// Image files written.
    pub images: usize,
    pub table_path: PathBuf,
}

/// Convert a recording into one table aligned on the reference stream.
///
/// Topics are selected, their messages split into streams (extracting
/// images on the way), every stream is resampled at the reference
/// timestamps and the sorted table is written to
/// [Config::table_path]. The table is only written when every step
/// succeeded.
pub fn convert<S>(source: &mut S, config: &Config) -> Result<Summary>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;

    let Config {
        include,
        exclude,
        output,
        classifier,
        timestamp_mode,
        ..
    } = config;

    // Select topics.
    let topics = source.topics()?;
    info!(num_topics = topics.len(), "Read recording index");

    let selected = filter_topics(
        topics.keys().map(|topic| topic.as_str()),
        include.as_deref(),
        exclude.as_deref(),
    )?;
    info!(num_selected = selected.len(), "Selected topics");

    // Prepare image directories before reading anything.
    let mut images = ImageSink::new(output);
    images.create_root()?;
    for topic in &selected {
        if classifier.is_image_topic(topic) && !classifier.is_metadata_topic(topic) {
            images.prepare(topic)?;
        }
    }

    // Split records into streams.
    let mut demux = Demultiplexer::new(classifier, *timestamp_mode);
    for record in source.records(&selected)? {
        let record = record?;
        demux.push(&record.topic, &record.message, &mut images)?;
    }
    let records = demux.records();
    let streams = demux.finish();
    info!(
        records,
        num_streams = streams.len(),
        images = images.written(),
        "Read all records"
    );

    // Resample onto the reference stream.
    let reference = streams
        .get(&classifier.reference)
        .filter(|series| !series.is_empty())
        .ok_or_else(|| Error::MissingReferenceStream {
            key: classifier.reference.clone(),
        })?;
    debug!(
        reference = %classifier.reference,
        samples = reference.len(),
        "Aligning on reference stream"
    );

    let timestamps = reference.timestamps().to_vec();
    let mut columns = IndexMap::with_capacity(streams.len());
    columns.insert(
        classifier.reference_column().to_string(),
        reference.values().to_vec(),
    );
    columns.extend(align(&timestamps, &streams, classifier)?);

    // Assemble and persist.
    let mut table = Table::assemble(timestamps, columns)?;
    table.sort_by_timestamp();

    let table_path = config.table_path();
    table.write_csv(&table_path)?;

    Ok(Summary {
        topics: selected,
        records,
        rows: table.len(),
        columns: table.column_names().count(),
        images: images.written(),
        table_path,
    })
}
