//! Runner configuration.
//!
//! Read from a TOML file (`runner/config.toml` by default, overridable via
//! the `OMNIOFT_CONFIG` environment variable) after loading `.env`.

use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "runner/config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    pub chains: Chains,
    pub fees: Fees,
    pub token: TokenConfig,
    pub scenario: Scenario,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chains {
    pub local_eid: u32,
    pub remote_eid: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fees {
    pub base_fee_wei: u64,
    pub per_byte_fee_wei: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub local_decimals: u8,
    pub shared_decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Amount deposited and bridged, in local base units.
    pub amount_wei: u64,
}

impl RunnerConfig {
    /// Loads configuration from the path named by `OMNIOFT_CONFIG`, or the
    /// default location next to the runner.
    pub fn load() -> Result<Self> {
        let path = env::var("OMNIOFT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading runner config from {path}"))?;
        let config: Self = toml::from_str(&raw).with_context(|| format!("parsing {path}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chains.local_eid == self.chains.remote_eid {
            return Err(anyhow!(
                "local and remote chains must have distinct eids (both are {})",
                self.chains.local_eid
            ));
        }
        if self.token.shared_decimals > self.token.local_decimals {
            return Err(anyhow!(
                "shared decimals ({}) exceed local decimals ({})",
                self.token.shared_decimals,
                self.token.local_decimals
            ));
        }
        if self.scenario.amount_wei == 0 {
            return Err(anyhow!("scenario amount must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_config() -> RunnerConfig {
        toml::from_str(include_str!("../config.toml")).unwrap()
    }

    #[test]
    fn shipped_config_parses_and_validates() {
        let config = shipped_config();
        config.validate().unwrap();
        assert_ne!(config.chains.local_eid, config.chains.remote_eid);
        assert_eq!(config.token.symbol, "OFT");
    }

    #[test]
    fn equal_eids_rejected() {
        let mut config = shipped_config();
        config.chains.remote_eid = config.chains.local_eid;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_decimals_rejected() {
        let mut config = shipped_config();
        config.token.shared_decimals = config.token.local_decimals + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_amount_rejected() {
        let mut config = shipped_config();
        config.scenario.amount_wei = 0;
        assert!(config.validate().is_err());
    }
}
