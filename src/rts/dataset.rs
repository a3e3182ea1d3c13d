use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};
use tracing::info;

use super::records::{read_table, BranchRecord, BusRecord, GenRecord};
use super::timeseries::{read_timeseries, TimeSeries};
use crate::config::CspConfig;
use crate::error::DataResult;

const SOURCE_DATA_DIR: &str = "SourceData";
const TIMESERIES_DIR: &str = "timeseries_data_files";

/// Time series shipped with RTS-GMLC that the experiments consume
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimeSeriesKind {
    LoadDaRegional,
    LoadRtRegional,
    PvDa,
    PvRt,
    WindDa,
    HydroDa,
    CspDa,
    RtpvDa,
}

impl TimeSeriesKind {
    /// Location relative to `timeseries_data_files/`
    pub fn relative_path(&self) -> PathBuf {
        let (dir, file) = match self {
            TimeSeriesKind::LoadDaRegional => ("Load", "DAY_AHEAD_regional_Load.csv"),
            TimeSeriesKind::LoadRtRegional => ("Load", "REAL_TIME_regional_Load.csv"),
            TimeSeriesKind::PvDa => ("PV", "DAY_AHEAD_pv.csv"),
            TimeSeriesKind::PvRt => ("PV", "REAL_TIME_pv.csv"),
            TimeSeriesKind::WindDa => ("WIND", "DAY_AHEAD_wind.csv"),
            TimeSeriesKind::HydroDa => ("HYDRO", "DAY_AHEAD_hydro.csv"),
            TimeSeriesKind::CspDa => ("CSP", "DAY_AHEAD_Natural_Inflow.csv"),
            TimeSeriesKind::RtpvDa => ("RTPV", "DAY_AHEAD_rtpv.csv"),
        };
        Path::new(dir).join(file)
    }
}

/// Raw RTS-GMLC system tables and time series
#[derive(Debug, Clone)]
pub struct RtsDataSet {
    pub rts_dir: PathBuf,
    pub base_mva: f64,
    pub csp: CspConfig,
    pub bus: Vec<BusRecord>,
    pub gen: Vec<GenRecord>,
    pub branch: Vec<BranchRecord>,
    pub timeseries: BTreeMap<TimeSeriesKind, TimeSeries>,
}

impl RtsDataSet {
    /// Read the system tables and every [`TimeSeriesKind`] from an RTS-GMLC checkout.
    pub fn load(rts_dir: impl AsRef<Path>, base_mva: f64, csp: CspConfig) -> DataResult<Self> {
        let mut dataset = Self::load_system(rts_dir, base_mva, csp)?;
        dataset.read_all_timeseries()?;
        Ok(dataset)
    }

    /// Read only `SourceData/{bus,gen,branch}.csv`.
    pub fn load_system(
        rts_dir: impl AsRef<Path>,
        base_mva: f64,
        csp: CspConfig,
    ) -> DataResult<Self> {
        let rts_dir = rts_dir.as_ref().to_path_buf();
        info!(dir = %rts_dir.display(), "reading system data");

        let source = rts_dir.join(SOURCE_DATA_DIR);
        let bus = read_table(&source.join("bus.csv"))?;
        let gen = read_table(&source.join("gen.csv"))?;
        let branch = read_table(&source.join("branch.csv"))?;

        info!(
            buses = bus.len(),
            gens = gen.len(),
            branches = branch.len(),
            "system data loaded"
        );

        Ok(Self {
            rts_dir,
            base_mva,
            csp,
            bus,
            gen,
            branch,
            timeseries: BTreeMap::new(),
        })
    }

    fn read_all_timeseries(&mut self) -> DataResult<()> {
        info!("reading time series data");
        for kind in TimeSeriesKind::iter() {
            let path = self.rts_dir.join(TIMESERIES_DIR).join(kind.relative_path());
            let series = read_timeseries(&path)?;
            info!(
                series = kind.as_ref(),
                rows = series.len(),
                columns = series.columns.len(),
                "time series loaded"
            );
            self.timeseries.insert(kind, series);
        }
        Ok(())
    }

    pub fn series(&self, kind: TimeSeriesKind) -> Option<&TimeSeries> {
        self.timeseries.get(&kind)
    }
}
