//! Piece-wise linear generator cost curves built from RTS heat-rate data.
//!
//! Each unit gets three segments between its four output breakpoints. Cost is
//! in $/h for an output in MW, hence the division by 1000:
//! BTU/kWh * 1000 kWh/MWh * MW * $/MMBTU * 1e-6 MMBTU/BTU.

use serde::{Deserialize, Serialize};

use crate::rts::{GenRecord, RtsDataSet};

pub const PWL_SEGMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PwlCost {
    pub slopes: Vec<f64>,
    pub intercepts: Vec<f64>,
    pub segments: usize,
}

impl PwlCost {
    /// All-zero curve for units without heat-rate data (wind, PV, hydro, ...)
    pub fn zero() -> Self {
        Self {
            slopes: vec![0.0; PWL_SEGMENTS],
            intercepts: vec![0.0; PWL_SEGMENTS],
            segments: PWL_SEGMENTS,
        }
    }

    pub fn from_gen(gen: &GenRecord) -> Self {
        let (Some(pcts), Some(rates), Some(fuel_price)) =
            (gen.output_pcts(), gen.heat_rates(), gen.fuel_price_dollar_per_mmbtu)
        else {
            return Self::zero();
        };

        // cumulative heat input at each breakpoint, per unit of pmax
        let mut heat = [0.0; PWL_SEGMENTS + 1];
        heat[0] = rates[0] * pcts[0];
        let mut level = heat[0];
        for s in 1..=PWL_SEGMENTS {
            heat[s] = level + (pcts[s] - pcts[s - 1]) * rates[s];
            level = level.max(heat[s]);
        }

        let scale = gen.pmax_mw * fuel_price / 1000.0;
        let xs: Vec<f64> = pcts.iter().map(|p| p * gen.pmax_mw).collect();
        let ys: Vec<f64> = heat.iter().map(|h| h * scale).collect();

        let mut slopes = Vec::with_capacity(PWL_SEGMENTS);
        let mut intercepts = Vec::with_capacity(PWL_SEGMENTS);
        for s in 1..=PWL_SEGMENTS {
            let dx = xs[s] - xs[s - 1];
            if dx == 0.0 {
                slopes.push(0.0);
                intercepts.push(0.0);
            } else {
                let slope = (ys[s] - ys[s - 1]) / dx;
                slopes.push(slope);
                intercepts.push(ys[s - 1] - slope * xs[s - 1]);
            }
        }

        Self {
            slopes,
            intercepts,
            segments: PWL_SEGMENTS,
        }
    }

    /// Cost at `p_mw` as the upper envelope of the non-degenerate segment lines
    pub fn evaluate(&self, p_mw: f64) -> f64 {
        self.slopes
            .iter()
            .zip(&self.intercepts)
            .filter(|&(&slope, &intercept)| slope != 0.0 || intercept != 0.0)
            .map(|(slope, intercept)| slope * p_mw + intercept)
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.max(c))))
            .unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.slopes.iter().chain(&self.intercepts).all(|&v| v == 0.0)
    }
}

/// Cost curves for every generator, in `gen.csv` order
pub fn pwl_costs(rts: &RtsDataSet) -> Vec<PwlCost> {
    rts.gen.iter().map(PwlCost::from_gen).collect()
}
