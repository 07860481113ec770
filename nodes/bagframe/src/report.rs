//! Human readable topic listing printed by `bagframe info`.

use bagframe_core::TopicInfo;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt::Write;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Renders a recording time in seconds as a UTC date.
fn format_time(secs: f64) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    match DateTime::<Utc>::from_timestamp(whole as i64, nanos) {
        Some(time) => time.format(TIME_FORMAT).to_string(),
        None => format!("{secs:.3}"),
    }
}

/// Formats one line per topic plus a summary of the whole recording.
pub fn render(topics: &IndexMap<String, TopicInfo>) -> String {
    let mut out = String::new();

    let first = topics.values().filter_map(|info| info.first_time).reduce(f64::min);
    let last = topics.values().filter_map(|info| info.last_time).reduce(f64::max);
    let messages: usize = topics.values().map(|info| info.message_count).sum();

    if let (Some(first), Some(last)) = (first, last) {
        let _ = writeln!(out, "start:    {}", format_time(first));
        let _ = writeln!(out, "end:      {}", format_time(last));
        let _ = writeln!(out, "duration: {:.3}s", last - first);
    }
    let _ = writeln!(out, "messages: {messages}");
    let _ = writeln!(out, "topics:   {}", topics.len());

    let width = topics.keys().map(|topic| topic.len()).max().unwrap_or(0);
    for (topic, info) in topics {
        let _ = write!(
            out,
            "  {topic:<width$}  {count:>7} msgs  {ty}",
            count = info.message_count,
            ty = info.msg_type,
        );
        if let (Some(first), Some(last)) = (info.first_time, info.last_time) {
            let _ = write!(out, "  ({:.3}s)", last - first);
        }
        out.push('\n');
    }

    out
}
