//! Topic selection.

use crate::error::Error;
use eyre::Result;
use indexmap::IndexSet;
use tracing::{debug, warn};

/// Filters the topics of a recording.
///
/// With `include`, the result lists the included topics that exist, in
/// `include` order. Otherwise `exclude` removes topics. With neither,
/// every topic is kept.
pub fn filter_topics<'a, I>(
    topics: I,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let topics: IndexSet<&str> = topics.into_iter().collect();
    debug!(?topics, ?include, ?exclude, "Filtering topics");

    if topics.is_empty() {
        return Err(Error::NoStreams.into());
    }

    let selected: Vec<String> = match (include, exclude) {
        (Some(include), _) => {
            let mut seen = IndexSet::new();
            for topic in include {
                if topics.contains(topic.as_str()) {
                    seen.insert(topic.clone());
                } else {
                    warn!(topic = %topic, "Requested topic is not in the recording");
                }
            }
            seen.into_iter().collect()
        }
        (None, Some(exclude)) => topics
            .iter()
            .filter(|topic| !exclude.iter().any(|e| e == *topic))
            .map(|topic| topic.to_string())
            .collect(),
        (None, None) => topics.iter().map(|topic| topic.to_string()).collect(),
    };

    if selected.is_empty() {
        return Err(Error::NoStreamsAfterFilter.into());
    }

    debug!(?selected, "Filtered topics");
    Ok(selected)
}

/// Lists the topics that may own the given field keys.
///
/// A key `/a/b/c` may belong to topic `/a` (field `b/c`) or `/a/b`
/// (field `c`). Keys without a leading slash get one.
pub fn topics_from_keys<I, S>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut topics = IndexSet::new();

    for key in keys {
        let key = key.as_ref();
        let key = if key.starts_with('/') {
            key.to_string()
        } else {
            format!("/{key}")
        };

        let chunks: Vec<&str> = key.split('/').collect();
        for end in 2..chunks.len() {
            topics.insert(chunks[..end].join("/"));
        }
    }

    topics.into_iter().collect()
}
