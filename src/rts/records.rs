use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File, path::Path};
use strum::{Display, EnumString};

use super::columns::normalize_headers;
use crate::error::{DataError, DataResult};

/// Bus classification as written in `bus.csv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum BusType {
    #[serde(rename = "PQ")]
    #[strum(serialize = "PQ")]
    Pq,
    #[serde(rename = "PV")]
    #[strum(serialize = "PV")]
    Pv,
    #[serde(rename = "Ref")]
    #[strum(serialize = "Ref")]
    Ref,
}

/// Row of `SourceData/bus.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRecord {
    pub bus_id: u32,
    pub bus_type: BusType,
    pub mw_load: f64,
    pub area: u32,
    pub lat: f64,
    pub lng: f64,
}

/// Row of `SourceData/gen.csv`
///
/// Heat-rate and fuel columns are empty for renewable units, hence optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenRecord {
    pub gen_uid: String,
    pub bus_id: u32,
    pub unit_type: String,
    pub fuel: String,
    pub pmax_mw: f64,
    pub pmin_mw: f64,
    #[serde(default)]
    pub min_down_time_hr: Option<f64>,
    #[serde(default)]
    pub min_up_time_hr: Option<f64>,
    #[serde(default)]
    pub ramp_rate_mw_per_min: Option<f64>,
    #[serde(default)]
    pub fuel_price_dollar_per_mmbtu: Option<f64>,
    #[serde(default)]
    pub output_pct_0: Option<f64>,
    #[serde(default)]
    pub output_pct_1: Option<f64>,
    #[serde(default)]
    pub output_pct_2: Option<f64>,
    #[serde(default)]
    pub output_pct_3: Option<f64>,
    #[serde(default)]
    pub hr_avg_0: Option<f64>,
    #[serde(default)]
    pub hr_incr_1: Option<f64>,
    #[serde(default)]
    pub hr_incr_2: Option<f64>,
    #[serde(default)]
    pub hr_incr_3: Option<f64>,
}

impl GenRecord {
    /// Output breakpoints as fractions of pmax, if all four are present
    pub fn output_pcts(&self) -> Option<[f64; 4]> {
        Some([
            self.output_pct_0?,
            self.output_pct_1?,
            self.output_pct_2?,
            self.output_pct_3?,
        ])
    }

    /// Average heat rate at the first breakpoint followed by the three incremental rates
    pub fn heat_rates(&self) -> Option<[f64; 4]> {
        Some([
            self.hr_avg_0?,
            self.hr_incr_1?,
            self.hr_incr_2?,
            self.hr_incr_3?,
        ])
    }
}

/// Row of `SourceData/branch.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub uid: String,
    pub from_bus: u32,
    pub to_bus: u32,
    pub r: f64,
    pub x: f64,
    pub b: f64,
    pub cont_rating: f64,
    pub ste_rating: f64,
}

/// Read a source table, normalizing its headers before deserializing rows.
///
/// Columns the record type does not name are ignored.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> DataResult<Vec<T>> {
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
    reader.set_headers(normalize_headers(&headers));

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| DataError::csv(path, e))?;

    if rows.is_empty() {
        return Err(DataError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}
