//! RTS-GMLC file readers.

pub mod columns;
pub mod dataset;
pub mod records;
pub mod timeseries;

pub use dataset::{RtsDataSet, TimeSeriesKind};
pub use records::{read_table, BranchRecord, BusRecord, BusType, GenRecord};
pub use timeseries::{read_timeseries, Resolution, TimeSeries};
