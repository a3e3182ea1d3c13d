use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{DataError, DataResult};
use crate::rts::{BusType, RtsDataSet};

/// Network bus with adjacency expressed as list indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub id: u32,
    pub bus_type: BusType,
    pub area: u32,
    pub lat: f64,
    pub lon: f64,
    /// Share of the area's MW load that sits on this bus
    pub area_load_share: f64,
    pub is_slack: bool,
    pub gens: Vec<usize>,
    pub branches_out: Vec<usize>,
    pub branches_in: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: String,
    pub unit_type: String,
    pub fuel: String,
    /// Index into [`PsData::buses`]
    pub bus: usize,
    pub min_down_time_hr: f64,
    pub min_up_time_hr: f64,
    pub pmax_mw: f64,
    pub pmax_pu: f64,
    pub pmin_mw: f64,
    pub pmin_pu: f64,
    pub ramp_rate_mw_min: f64,
    pub ramp_rate_pu_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub from_bus: usize,
    pub to_bus: usize,
    pub r_pu: f64,
    pub x_pu: f64,
    pub b_pu: f64,
    pub cap_mw: f64,
    pub cap_pu: f64,
    pub emergency_cap_mw: f64,
    pub emergency_cap_pu: f64,
}

/// Normalized power system: per-unit quantities, index maps and slack bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsData {
    pub base_mva: f64,
    pub buses: Vec<Bus>,
    /// RTS bus id -> list index
    pub bus_index: HashMap<u32, usize>,
    pub gens: Vec<Generator>,
    /// Generator UID -> list index
    pub gen_index: HashMap<String, usize>,
    pub branches: Vec<Branch>,
    /// Branch UID -> list index
    pub branch_index: HashMap<String, usize>,
    pub slack_bus: Option<usize>,
}

impl PsData {
    pub fn from_rts(rts: &RtsDataSet) -> DataResult<Self> {
        let base_mva = rts.base_mva;
        let area_load: HashMap<u32, f64> = rts
            .bus
            .iter()
            .map(|b| (b.area, b.mw_load))
            .into_grouping_map()
            .sum();

        let mut buses = Vec::with_capacity(rts.bus.len());
        let mut bus_index = HashMap::with_capacity(rts.bus.len());
        let mut slack_bus = None;

        for (i, record) in rts.bus.iter().enumerate() {
            let is_slack = record.bus_type == BusType::Ref;
            if is_slack {
                if let Some(previous) = slack_bus {
                    warn!(previous, current = i, "multiple reference buses, keeping the last one");
                }
                slack_bus = Some(i);
            }

            let total = area_load.get(&record.area).copied().unwrap_or_default();
            let area_load_share = if total != 0.0 { record.mw_load / total } else { 0.0 };

            buses.push(Bus {
                id: record.bus_id,
                bus_type: record.bus_type,
                area: record.area,
                lat: record.lat,
                lon: record.lng,
                area_load_share,
                is_slack,
                gens: Vec::new(),
                branches_out: Vec::new(),
                branches_in: Vec::new(),
            });
            bus_index.insert(record.bus_id, i);
        }

        let lookup = |bus_id: u32, context: &str| -> DataResult<usize> {
            bus_index.get(&bus_id).copied().ok_or_else(|| DataError::UnknownBus {
                context: context.to_string(),
                bus_id,
            })
        };

        let mut gens = Vec::with_capacity(rts.gen.len());
        let mut gen_index = HashMap::with_capacity(rts.gen.len());
        for (i, record) in rts.gen.iter().enumerate() {
            let bus = lookup(record.bus_id, &format!("generator {}", record.gen_uid))?;
            let ramp_rate_mw_min = record.ramp_rate_mw_per_min.unwrap_or_default();
            gens.push(Generator {
                id: record.gen_uid.clone(),
                unit_type: record.unit_type.clone(),
                fuel: record.fuel.clone(),
                bus,
                min_down_time_hr: record.min_down_time_hr.unwrap_or_default(),
                min_up_time_hr: record.min_up_time_hr.unwrap_or_default(),
                pmax_mw: record.pmax_mw,
                pmax_pu: record.pmax_mw / base_mva,
                pmin_mw: record.pmin_mw,
                pmin_pu: record.pmin_mw / base_mva,
                ramp_rate_mw_min,
                ramp_rate_pu_min: ramp_rate_mw_min / base_mva,
            });
            gen_index.insert(record.gen_uid.clone(), i);
        }

        let mut branches = Vec::with_capacity(rts.branch.len());
        let mut branch_index = HashMap::with_capacity(rts.branch.len());
        for (i, record) in rts.branch.iter().enumerate() {
            let context = format!("branch {}", record.uid);
            let from_bus = lookup(record.from_bus, &context)?;
            let to_bus = lookup(record.to_bus, &context)?;
            branches.push(Branch {
                id: record.uid.clone(),
                from_bus,
                to_bus,
                r_pu: record.r,
                x_pu: record.x,
                b_pu: record.b,
                cap_mw: record.cont_rating,
                cap_pu: record.cont_rating / base_mva,
                emergency_cap_mw: record.ste_rating,
                emergency_cap_pu: record.ste_rating / base_mva,
            });
            branch_index.insert(record.uid.clone(), i);
        }

        for (i, gen) in gens.iter().enumerate() {
            buses[gen.bus].gens.push(i);
        }
        for (i, branch) in branches.iter().enumerate() {
            buses[branch.from_bus].branches_out.push(i);
            buses[branch.to_bus].branches_in.push(i);
        }

        debug!(
            buses = buses.len(),
            gens = gens.len(),
            branches = branches.len(),
            ?slack_bus,
            "built power system data"
        );

        Ok(Self {
            base_mva,
            buses,
            bus_index,
            gens,
            gen_index,
            branches,
            branch_index,
            slack_bus,
        })
    }

    pub fn n_buses(&self) -> usize {
        self.buses.len()
    }

    pub fn n_gens(&self) -> usize {
        self.gens.len()
    }

    pub fn n_branches(&self) -> usize {
        self.branches.len()
    }

    /// Bus list index of every generator
    pub fn gen_to_bus(&self) -> Vec<usize> {
        self.gens.iter().map(|g| g.bus).collect()
    }

    /// `(from, to)` bus list indices of every branch
    pub fn branch_to_buses(&self) -> Vec<(usize, usize)> {
        self.branches.iter().map(|b| (b.from_bus, b.to_bus)).collect()
    }

    pub fn bus(&self, id: u32) -> Option<&Bus> {
        self.bus_index.get(&id).map(|&i| &self.buses[i])
    }

    pub fn generator(&self, uid: &str) -> Option<&Generator> {
        self.gen_index.get(uid).map(|&i| &self.gens[i])
    }

    pub fn branch(&self, uid: &str) -> Option<&Branch> {
        self.branch_index.get(uid).map(|&i| &self.branches[i])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::CspConfig;
    use crate::rts::{BranchRecord, BusRecord, GenRecord};
    use std::collections::BTreeMap;

    fn bus(bus_id: u32, bus_type: BusType, mw_load: f64, area: u32) -> BusRecord {
        BusRecord {
            bus_id,
            bus_type,
            mw_load,
            area,
            lat: 33.0,
            lng: -113.0,
        }
    }

    pub(crate) fn thermal_gen(gen_uid: &str, bus_id: u32) -> GenRecord {
        GenRecord {
            gen_uid: gen_uid.to_string(),
            bus_id,
            unit_type: "CT".to_string(),
            fuel: "Oil".to_string(),
            pmax_mw: 20.0,
            pmin_mw: 8.0,
            min_down_time_hr: Some(2.0),
            min_up_time_hr: Some(1.0),
            ramp_rate_mw_per_min: Some(3.0),
            fuel_price_dollar_per_mmbtu: Some(10.0),
            output_pct_0: Some(0.4),
            output_pct_1: Some(0.6),
            output_pct_2: Some(0.8),
            output_pct_3: Some(1.0),
            hr_avg_0: Some(15000.0),
            hr_incr_1: Some(9000.0),
            hr_incr_2: Some(10000.0),
            hr_incr_3: Some(11000.0),
        }
    }

    fn branch(uid: &str, from_bus: u32, to_bus: u32) -> BranchRecord {
        BranchRecord {
            uid: uid.to_string(),
            from_bus,
            to_bus,
            r: 0.003,
            x: 0.014,
            b: 0.461,
            cont_rating: 175.0,
            ste_rating: 193.0,
        }
    }

    pub(crate) fn three_bus_system() -> RtsDataSet {
        RtsDataSet {
            rts_dir: "unused".into(),
            base_mva: 100.0,
            csp: CspConfig::default(),
            bus: vec![
                bus(101, BusType::Pv, 100.0, 1),
                bus(102, BusType::Ref, 300.0, 1),
                bus(201, BusType::Pq, 0.0, 2),
            ],
            gen: vec![thermal_gen("101_CT_1", 101), thermal_gen("102_CT_1", 102)],
            branch: vec![branch("A1", 101, 102), branch("AB1", 102, 201)],
            timeseries: BTreeMap::new(),
        }
    }

    #[test]
    fn builds_index_maps_and_adjacency() {
        let ps = PsData::from_rts(&three_bus_system()).unwrap();

        assert_eq!(ps.n_buses(), 3);
        assert_eq!(ps.n_gens(), 2);
        assert_eq!(ps.n_branches(), 2);
        assert_eq!(ps.bus_index[&201], 2);
        assert_eq!(ps.gen_to_bus(), vec![0, 1]);
        assert_eq!(ps.branch_to_buses(), vec![(0, 1), (1, 2)]);

        let hub = ps.bus(102).unwrap();
        assert_eq!(hub.gens, vec![1]);
        assert_eq!(hub.branches_in, vec![0]);
        assert_eq!(hub.branches_out, vec![1]);
    }

    #[test]
    fn marks_reference_bus_as_slack() {
        let ps = PsData::from_rts(&three_bus_system()).unwrap();
        assert_eq!(ps.slack_bus, Some(1));
        assert!(ps.buses[1].is_slack);
        assert!(!ps.buses[0].is_slack);
    }

    #[test]
    fn area_load_shares_sum_to_one_per_loaded_area() {
        let ps = PsData::from_rts(&three_bus_system()).unwrap();
        assert!((ps.buses[0].area_load_share - 0.25).abs() < 1e-12);
        assert!((ps.buses[1].area_load_share - 0.75).abs() < 1e-12);
        // area 2 carries no load at all
        assert_eq!(ps.buses[2].area_load_share, 0.0);
    }

    #[test]
    fn converts_ratings_to_per_unit() {
        let ps = PsData::from_rts(&three_bus_system()).unwrap();
        let gen = ps.generator("101_CT_1").unwrap();
        assert_eq!(gen.pmax_pu, 0.2);
        assert_eq!(gen.pmin_pu, 0.08);
        assert_eq!(gen.ramp_rate_pu_min, 0.03);

        let line = ps.branch("A1").unwrap();
        assert_eq!(line.cap_pu, 1.75);
        assert_eq!(line.emergency_cap_pu, 1.93);
    }

    #[test]
    fn unknown_bus_reference_is_an_error() {
        let mut rts = three_bus_system();
        rts.branch.push(branch("X9", 101, 999));
        let err = PsData::from_rts(&rts).unwrap_err();
        assert!(matches!(err, DataError::UnknownBus { bus_id: 999, .. }));
    }

    #[test]
    fn no_reference_bus_leaves_slack_unset() {
        let mut rts = three_bus_system();
        rts.bus[1].bus_type = BusType::Pv;
        let ps = PsData::from_rts(&rts).unwrap();
        assert_eq!(ps.slack_bus, None);
    }

    #[test]
    fn several_reference_buses_keep_the_last() {
        let mut rts = three_bus_system();
        rts.bus[0].bus_type = BusType::Ref;
        let ps = PsData::from_rts(&rts).unwrap();

        assert_eq!(ps.slack_bus, Some(1));
        assert!(ps.buses[0].is_slack);
        assert!(ps.buses[1].is_slack);
        assert!(!ps.buses[2].is_slack);
    }
}
