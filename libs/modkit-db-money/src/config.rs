//! Configuration for money column declarations.
//!
//! Values are layered with `figment`: built-in defaults, then an optional
//! YAML file, then `MONEY_*` environment variables.
//!
//! ```yaml
//! currency_length: 3
//! currency_suffix: "_currency"
//! amount_suffix: "_amount"
//! rounding: half_even
//! range_check: true
//! pairing_check: true
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use crate::currency::CURRENCY_CODE_LEN;
use crate::error::Result;

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "MONEY_";

/// How amounts are rounded to the column scale before they are stored or compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Midpoints round away from zero (`0.125 -> 0.13`).
    #[default]
    HalfUp,
    /// Banker's rounding: midpoints round to the even neighbour (`0.125 -> 0.12`).
    HalfEven,
}

impl RoundingPolicy {
    #[must_use]
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Defaults applied by [`crate::composite_money_with`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoneyConfig {
    /// Width of the `CHAR` currency sub-column.
    pub currency_length: u32,
    /// Suffix appended to the base name for the currency sub-column.
    pub currency_suffix: String,
    /// Suffix appended to the base name for the amount sub-column.
    pub amount_suffix: String,
    pub rounding: RoundingPolicy,
    /// Emit a `CHECK` constraint bounding the amount to `precision - scale` integer digits.
    pub range_check: bool,
    /// Emit a `CHECK` constraint keeping both sub-columns NULL or both set.
    pub pairing_check: bool,
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            currency_length: 3,
            currency_suffix: "_currency".to_owned(),
            amount_suffix: "_amount".to_owned(),
            rounding: RoundingPolicy::HalfUp,
            range_check: true,
            pairing_check: true,
        }
    }
}

impl MoneyConfig {
    /// Extract the configuration under `key` of an existing figment.
    ///
    /// A missing key yields the defaults.
    ///
    /// # Errors
    /// Returns `MoneyError::Config` if the section cannot be deserialized.
    pub fn from_figment(figment: &Figment, key: &str) -> Result<Self> {
        let cfg: Self = figment.focus(key).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load defaults, then `path` (if given), then `MONEY_*` environment variables.
    ///
    /// # Errors
    /// Returns `MoneyError::Config` if a source is malformed or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        cfg.validate()?;
        tracing::debug!(?cfg, "loaded money column configuration");
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let len = usize::try_from(self.currency_length).unwrap_or(usize::MAX);
        if len < CURRENCY_CODE_LEN {
            return Err(figment::Error::from(format!(
                "currency_length must be at least {CURRENCY_CODE_LEN}, got {}",
                self.currency_length
            ))
            .into());
        }
        if self.currency_suffix == self.amount_suffix {
            return Err(figment::Error::from(format!(
                "currency_suffix and amount_suffix must differ, both are '{}'",
                self.currency_suffix
            ))
            .into());
        }
        Ok(())
    }
}
