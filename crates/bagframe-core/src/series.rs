use crate::types::Value;

/// The samples of one stream, stored as parallel time and value
/// sequences in recording order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    timestamps: Vec<f64>,
    values: Vec<Value>,
    last_ts: Option<f64>,
    /// Number of samples that arrived with a smaller timestamp than the
    /// previous one.
    regressions: usize,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            last_ts: None,
            regressions: 0,
        }
    }

    /// Builds a series from `(timestamp, value)` pairs.
    pub fn from_samples<I, V>(samples: I) -> Self
    where
        I: IntoIterator<Item = (f64, V)>,
        V: Into<Value>,
    {
        let mut series = Self::new();
        for (timestamp, value) in samples {
            series.push(timestamp, value.into());
        }
        series
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_ts
    }

    pub fn regressions(&self) -> usize {
        self.regressions
    }

    /// Appends a sample.
    ///
    /// Samples are kept even when their timestamp is below that of the
    /// previous sample. The method returns false in that case so the
    /// caller can report it.
    pub fn push(&mut self, timestamp: f64, value: Value) -> bool {
        let in_order = match self.last_ts {
            Some(last_ts) => timestamp >= last_ts,
            None => true,
        };

        if !in_order {
            self.regressions += 1;
        }

        self.last_ts = Some(timestamp);
        self.timestamps.push(timestamp);
        self.values.push(value);
        in_order
    }

    /// Returns sample positions ordered by timestamp. Equal timestamps
    /// keep their recording order.
    pub fn time_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        if self.regressions > 0 {
            order.sort_by(|&a, &b| self.timestamps[a].total_cmp(&self.timestamps[b]));
        }
        order
    }
}
