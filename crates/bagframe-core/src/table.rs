//! The aligned output table.

use crate::{error::Error, types::Value};
use eyre::{Result, WrapErr};
use indexmap::IndexMap;
use itertools::Itertools;
use std::{fs, io, path::Path};
use tracing::info;

pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Rows indexed by reference timestamp, one column per stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    timestamps: Vec<f64>,
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    /// Builds a table from the reference timestamps and columns of equal
    /// length.
    pub fn assemble(timestamps: Vec<f64>, columns: IndexMap<String, Vec<Value>>) -> Result<Self> {
        let expected = timestamps.len();
        for (key, column) in &columns {
            if column.len() != expected {
                return Err(Error::ColumnLength {
                    key: key.clone(),
                    expected,
                    actual: column.len(),
                }
                .into());
            }
        }

        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn column(&self, key: &str) -> Option<&[Value]> {
        self.columns.get(key).map(|column| column.as_slice())
    }

    /// Header names, starting with the timestamp column.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(TIMESTAMP_COLUMN).chain(self.columns.keys().map(|key| key.as_str()))
    }

    /// Reorders rows by ascending timestamp. Rows with equal timestamps
    /// keep their relative order.
    pub fn sort_by_timestamp(&mut self) {
        let order: Vec<usize> = (0..self.len())
            .sorted_by(|&a, &b| self.timestamps[a].total_cmp(&self.timestamps[b]))
            .collect();

        if order.iter().enumerate().all(|(row, &index)| row == index) {
            return;
        }

        self.timestamps = order.iter().map(|&i| self.timestamps[i]).collect();
        for column in self.columns.values_mut() {
            *column = order.iter().map(|&i| column[i].clone()).collect();
        }
    }

    /// Writes the table as CSV. The first column holds the row index and
    /// has an empty header.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let header = std::iter::once("").chain(self.column_names());
        writer.write_record(header)?;

        for (row, timestamp) in self.timestamps.iter().enumerate() {
            let record = [row.to_string(), Value::Number(*timestamp).to_string()]
                .into_iter()
                .chain(self.columns.values().map(|column| column[row].to_string()));
            writer.write_record(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the table to `path`.
    ///
    /// The content goes to a sibling temporary file first and is renamed
    /// into place once complete.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut tmp_path = path.as_os_str().to_owned();
        tmp_path.push(".partial");

        let file = fs::File::create(&tmp_path)
            .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
        self.write_to(io::BufWriter::new(file))
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        fs::rename(&tmp_path, path)
            .wrap_err_with(|| format!("Failed to move table into {}", path.display()))?;

        info!(
            path = %path.display(),
            rows = self.len(),
            columns = self.columns.len() + 1,
            "Wrote table"
        );
        Ok(())
    }
}
