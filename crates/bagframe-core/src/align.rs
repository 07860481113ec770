//! Resampling of every stream onto the reference timestamps.

use crate::{
    classify::{Classifier, StreamKind},
    error::Error,
    interp::{Linear, MIN_SAMPLES, NextIndex},
    series::Series,
    types::Value,
};
use eyre::Result;
use indexmap::IndexMap;
use tracing::debug;

/// Resamples every stream except the reference one and the skipped ones
/// at `reference` timestamps.
///
/// Each returned column has one value per reference timestamp, in the
/// same order. Discrete streams pick the value of the next sample,
/// every other stream is linearly interpolated.
pub fn align(
    reference: &[f64],
    streams: &IndexMap<String, Series>,
    classifier: &Classifier,
) -> Result<IndexMap<String, Vec<Value>>> {
    let mut columns = IndexMap::with_capacity(streams.len());

    for (key, series) in streams {
        if classifier.is_reference(key) || classifier.is_skipped(key) {
            continue;
        }

        let kind = classifier.stream_kind(key);
        let column = match kind {
            StreamKind::Discrete => resample_discrete(key, series, reference)?,
            StreamKind::Continuous | StreamKind::Excluded => {
                resample_continuous(key, series, reference)?
            }
        };

        debug!(stream = %key, ?kind, samples = series.len(), "Resampled stream");
        columns.insert(key.clone(), column);
    }

    Ok(columns)
}

/// Linearly interpolates a numeric stream at `reference`.
pub fn resample_continuous(key: &str, series: &Series, reference: &[f64]) -> Result<Vec<Value>> {
    ensure_samples(key, series)?;

    let order = series.time_order();
    let xs: Vec<f64> = order.iter().map(|&i| series.timestamps()[i]).collect();
    let ys = order
        .iter()
        .map(|&index| {
            series.values()[index]
                .as_number()
                .ok_or_else(|| Error::NonNumericValue {
                    key: key.to_string(),
                    index,
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let Some(interpolant) = Linear::new(xs, ys) else {
        return Err(insufficient(key, series));
    };

    Ok(reference
        .iter()
        .map(|&t| Value::Number(interpolant.eval(t)))
        .collect())
}

/// Looks up the value of the first sample at or after each reference
/// timestamp, holding the edge samples outside the sampled range.
pub fn resample_discrete(key: &str, series: &Series, reference: &[f64]) -> Result<Vec<Value>> {
    ensure_samples(key, series)?;

    let order = series.time_order();
    let xs: Vec<f64> = order.iter().map(|&i| series.timestamps()[i]).collect();

    let Some(interpolant) = NextIndex::new(xs) else {
        return Err(insufficient(key, series));
    };

    Ok(reference
        .iter()
        .map(|&t| series.values()[order[interpolant.index(t)]].clone())
        .collect())
}

fn ensure_samples(key: &str, series: &Series) -> Result<()> {
    if series.len() < MIN_SAMPLES {
        return Err(insufficient(key, series));
    }
    Ok(())
}

fn insufficient(key: &str, series: &Series) -> eyre::Report {
    Error::InsufficientSamples {
        key: key.to_string(),
        count: series.len(),
        required: MIN_SAMPLES,
    }
    .into()
}
