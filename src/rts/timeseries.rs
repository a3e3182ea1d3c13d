use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

use crate::error::{DataError, DataResult};

const KEY_COLUMNS: [&str; 4] = ["Year", "Month", "Day", "Period"];
const HOURLY_PERIODS: u32 = 24;
const FIVE_MINUTE_PERIODS: u32 = 288;

/// Sampling interval, inferred from the largest `Period` in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Hourly,
    FiveMinute,
    Irregular,
}

impl Resolution {
    fn from_max_period(max_period: u32) -> Self {
        match max_period {
            HOURLY_PERIODS => Resolution::Hourly,
            FIVE_MINUTE_PERIODS => Resolution::FiveMinute,
            _ => Resolution::Irregular,
        }
    }

    fn offset(&self, period: u32) -> Option<chrono::Duration> {
        let step = i64::from(period) - 1;
        match self {
            Resolution::Hourly => Some(chrono::Duration::hours(step)),
            Resolution::FiveMinute => Some(chrono::Duration::minutes(5 * step)),
            Resolution::Irregular => None,
        }
    }
}

/// One RTS-GMLC time series file: a row per period, a column per area or unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub resolution: Resolution,
    /// `None` when the resolution could not be inferred
    pub timestamps: Option<Vec<NaiveDateTime>>,
    pub columns: Vec<String>,
    pub rows: usize,
    /// Column-major: `values[c][row]`
    pub values: Vec<Vec<f64>>,
}

struct RawRow {
    date: NaiveDate,
    period: u32,
}

/// Read an RTS-GMLC time series CSV and attach timestamps.
pub fn read_timeseries(path: &Path) -> DataResult<TimeSeries> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| DataError::csv(path, e))?
        .clone();

    let mut key_idx = [0usize; 4];
    for (slot, key) in key_idx.iter_mut().zip(KEY_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == key)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: key.to_string(),
            })?;
    }

    let series_idx: Vec<usize> = (0..headers.len())
        .filter(|i| !key_idx.contains(i))
        .collect();
    let columns: Vec<String> = series_idx.iter().map(|&i| headers[i].to_string()).collect();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); series_idx.len()];
    let mut rows = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DataError::csv(path, e))?;
        let invalid = |message: String| DataError::InvalidValue {
            path: path.to_path_buf(),
            row,
            message,
        };
        let not_a_number = |i: usize| {
            invalid(format!("'{}' in column {} is not a number", &record[i], &headers[i]))
        };

        let year: i32 = record[key_idx[0]].parse().map_err(|_| not_a_number(key_idx[0]))?;
        let month: u32 = record[key_idx[1]].parse().map_err(|_| not_a_number(key_idx[1]))?;
        let day: u32 = record[key_idx[2]].parse().map_err(|_| not_a_number(key_idx[2]))?;
        let period: u32 = record[key_idx[3]].parse().map_err(|_| not_a_number(key_idx[3]))?;
        if period < 1 {
            return Err(invalid(format!("period {} must be at least 1", period)));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid(format!("{}-{}-{} is not a calendar date", year, month, day)))?;
        rows.push(RawRow { date, period });

        for (column, &i) in values.iter_mut().zip(&series_idx) {
            let value = record[i].parse::<f64>().map_err(|_| not_a_number(i))?;
            column.push(value);
        }
    }

    if rows.is_empty() {
        return Err(DataError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let max_period = rows.iter().map(|r| r.period).max().unwrap_or_default();
    let resolution = Resolution::from_max_period(max_period);
    let timestamps = match resolution {
        Resolution::Irregular => {
            tracing::warn!(
                path = %path.display(),
                max_period,
                "neither 5 min nor hourly data, leaving series without timestamps"
            );
            None
        }
        _ => Some(
            rows.iter()
                .filter_map(|r| {
                    r.date
                        .and_hms_opt(0, 0, 0)
                        .zip(resolution.offset(r.period))
                        .map(|(midnight, offset)| midnight + offset)
                })
                .collect(),
        ),
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(TimeSeries {
        name,
        resolution,
        timestamps,
        columns,
        rows: rows.len(),
        values,
    })
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    pub fn value_at(&self, column: &str, at: NaiveDateTime) -> Option<f64> {
        let row = self.timestamps.as_ref()?.iter().position(|&t| t == at)?;
        self.column(column).map(|values| values[row])
    }

    /// Rows with `start <= timestamp < end`
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> DataResult<TimeSeries> {
        let timestamps = self.timestamps.as_ref().ok_or_else(|| DataError::NoTimestamps {
            name: self.name.clone(),
        })?;
        let rows: Vec<usize> = timestamps
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= start && t < end)
            .map(|(i, _)| i)
            .collect();

        Ok(TimeSeries {
            name: self.name.clone(),
            resolution: self.resolution,
            timestamps: Some(rows.iter().map(|&i| timestamps[i]).collect()),
            columns: self.columns.clone(),
            rows: rows.len(),
            values: self
                .values
                .iter()
                .map(|column| rows.iter().map(|&i| column[i]).collect())
                .collect(),
        })
    }
}
