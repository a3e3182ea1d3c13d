pub mod cost;
pub mod model;

pub use cost::{pwl_costs, PwlCost, PWL_SEGMENTS};
pub use model::{Branch, Bus, Generator, PsData};
