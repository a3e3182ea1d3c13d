//! Seeded sample generation and train/test splitting for experiments.

pub mod sampler;
pub mod split;

pub use sampler::CorrelatedSampler;
pub use split::{train_test_split, Split};
