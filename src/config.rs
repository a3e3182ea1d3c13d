use anyhow::{Context, Result};
use figment::{
    providers::{Data, Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
const ENV_PREFIX: &str = "ROPF__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub data: DataConfig,
    #[validate(nested)]
    pub csp: CspConfig,
    #[validate(nested)]
    pub experiment: ExperimentConfig,
}

/// Location of the RTS-GMLC checkout and the system base
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataConfig {
    pub rts_dir: PathBuf,
    #[validate(range(exclusive_min = 0.0))]
    pub base_mva: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            rts_dir: PathBuf::from("RTS-GMLC"),
            // matpower case base
            base_mva: 100.0,
        }
    }
}

/// Concentrated solar plant parameters not carried by the RTS tables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct CspConfig {
    /// Storage duration (hours)
    #[validate(range(min = 0.0))]
    pub h_max: f64,
    /// Solar multiple
    #[validate(range(exclusive_min = 0.0))]
    pub solar_multiple: f64,
    /// Simplified round-trip efficiency
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub efficiency: f64,
}

impl Default for CspConfig {
    fn default() -> Self {
        // Barrows et al., "The IEEE Reliability Test System: A Proposed 2019 Update"
        Self {
            h_max: 6.0,
            solar_multiple: 1.6,
            efficiency: 0.9,
        }
    }
}

/// Experiment defaults shared by every run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExperimentConfig {
    pub seed: u64,
    #[validate(range(min = 1))]
    pub n_data: usize,
    pub max_epoch: usize,
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub test_perc: f64,
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub corr: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_data: 1000,
            max_epoch: 100,
            test_perc: 0.25,
            corr: 0.5,
        }
    }
}

impl Config {
    /// Defaults, then `config/default.toml` if present, then `ROPF__*` env vars.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::layered(Toml::file(DEFAULT_CONFIG_FILE)))
    }

    /// Like [`Config::load`] but the TOML file must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("configuration file {} does not exist", path.display());
        }
        Self::from_figment(Self::layered(Toml::file_exact(path)))
    }

    fn layered(file: Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to extract configuration")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn defaults_match_experiment_settings() {
        let cfg = Config::default();
        assert_eq!(cfg.experiment.seed, 42);
        assert_eq!(cfg.experiment.n_data, 1000);
        assert_eq!(cfg.experiment.max_epoch, 100);
        assert_eq!(cfg.experiment.test_perc, 0.25);
        assert_eq!(cfg.experiment.corr, 0.5);
        assert_eq!(cfg.data.base_mva, 100.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(
            r#"
            [data]
            rts_dir = "/data/rts"

            [experiment]
            n_data = 250
            corr = 0.2
            "#,
        ));
        let cfg = Config::from_figment(figment).unwrap();
        assert_eq!(cfg.data.rts_dir, PathBuf::from("/data/rts"));
        assert_eq!(cfg.data.base_mva, 100.0);
        assert_eq!(cfg.experiment.n_data, 250);
        assert_eq!(cfg.experiment.corr, 0.2);
        assert_eq!(cfg.experiment.seed, 42);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string("[experiment]\ntest_perc = 1.0\n"));
        assert!(Config::from_figment(figment).is_err());

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string("[data]\nbase_mva = 0.0\n"));
        assert!(Config::from_figment(figment).is_err());
    }

    #[rstest]
    #[case("[experiment]\ncorr = 1.0\n")]
    #[case("[experiment]\ncorr = -0.1\n")]
    #[case("[experiment]\nn_data = 0\n")]
    #[case("[csp]\nefficiency = 0.0\n")]
    #[case("[csp]\nefficiency = 1.5\n")]
    fn rejects_invalid_ranges(#[case] toml: &str) {
        let figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn env_overrides_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("robust.toml", "[experiment]\nn_data = 250\nseed = 7\n")?;
            jail.set_env("ROPF__EXPERIMENT__N_DATA", "77");
            jail.set_env("ROPF__DATA__RTS_DIR", "/srv/rts");

            let cfg = Config::load_from("robust.toml").unwrap();
            assert_eq!(cfg.experiment.n_data, 77);
            assert_eq!(cfg.experiment.seed, 7);
            assert_eq!(cfg.data.rts_dir, PathBuf::from("/srv/rts"));
            Ok(())
        });
    }

    #[test]
    fn load_tolerates_missing_default_file() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load().unwrap();
            assert_eq!(cfg.experiment.n_data, 1000);
            Ok(())
        });
    }

    #[test]
    fn load_from_requires_existing_file() {
        let err = Config::load_from("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
