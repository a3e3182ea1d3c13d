use anyhow::{Context, Result};
use robust_opf::{
    config::Config,
    experiment::{train_test_split, CorrelatedSampler},
    network::{pwl_costs, PsData},
    rts::{RtsDataSet, TimeSeriesKind},
    telemetry::init_tracing,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Serialize)]
struct Summary {
    base_mva: f64,
    buses: usize,
    gens: usize,
    branches: usize,
    slack_bus: Option<u32>,
    priced_gens: usize,
    series_rows: BTreeMap<TimeSeriesKind, usize>,
    train_samples: usize,
    test_samples: usize,
}

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    info!(rts_dir = %cfg.data.rts_dir.display(), "starting robust-opf data preparation");

    let rts = RtsDataSet::load(&cfg.data.rts_dir, cfg.data.base_mva, cfg.csp)
        .with_context(|| format!("loading RTS-GMLC data from {}", cfg.data.rts_dir.display()))?;
    let ps = PsData::from_rts(&rts).context("building power system data")?;
    let costs = pwl_costs(&rts);

    let stochastic_units = ps
        .gens
        .iter()
        .filter(|g| matches!(g.unit_type.as_str(), "WIND" | "PV" | "RTPV"))
        .count();
    let samples = CorrelatedSampler::new(&cfg.experiment).sample(stochastic_units);
    let split = train_test_split(samples.len(), cfg.experiment.test_perc, cfg.experiment.seed);
    info!(
        dims = stochastic_units,
        train = split.train.len(),
        test = split.test.len(),
        "sampled forecast deviations"
    );

    let summary = Summary {
        base_mva: ps.base_mva,
        buses: ps.n_buses(),
        gens: ps.n_gens(),
        branches: ps.n_branches(),
        slack_bus: ps.slack_bus.map(|i| ps.buses[i].id),
        priced_gens: costs.iter().filter(|c| !c.is_zero()).count(),
        series_rows: rts
            .timeseries
            .iter()
            .map(|(kind, series)| (*kind, series.len()))
            .collect(),
        train_samples: split.train.len(),
        test_samples: split.test.len(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
