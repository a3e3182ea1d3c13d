//! RTS-GMLC power system data layer for robust optimal power flow experiments.
//!
//! Reads the RTS-GMLC source tables and time series, normalizes them into a
//! per-unit network model with piece-wise linear generator costs, and provides
//! the seeded sampling helpers the experiments are driven by.

pub mod config;
pub mod error;
pub mod experiment;
pub mod network;
pub mod rts;
pub mod telemetry;

pub use config::Config;
pub use error::{DataError, DataResult};
pub use network::{PsData, PwlCost};
pub use rts::{RtsDataSet, TimeSeries, TimeSeriesKind};
