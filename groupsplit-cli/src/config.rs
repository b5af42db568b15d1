use groupsplit_domain::{MAX_ATOMIC_SCALE, Money, Tolerance};
use rust_decimal::Decimal;
use std::env;

const EPSILON_VAR: &str = "GROUPSPLIT_EPSILON";
const DISPLAY_SCALE_VAR: &str = "GROUPSPLIT_DISPLAY_SCALE";
const ATOMIC_SCALE_VAR: &str = "GROUPSPLIT_ATOMIC_SCALE";

const DEFAULT_DISPLAY_SCALE: u32 = 2;
const MAX_DISPLAY_SCALE: u32 = 28;
const DEFAULT_ATOMIC_SCALE: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a decimal number of at least 1e-18 (got '{value}')")]
    InvalidEpsilon { name: &'static str, value: String },
    #[error("{name} must be an integer between 0 and {max} (got '{value}')")]
    InvalidScale {
        name: &'static str,
        value: String,
        max: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub tolerance: Tolerance,
    /// Decimal places shown for amounts.
    pub display_scale: u32,
    /// Decimal places of the smallest transferable unit (9 = lamports).
    pub atomic_scale: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tolerance = match lookup(EPSILON_VAR) {
            Some(value) => parse_tolerance(&value)?,
            None => Tolerance::DEFAULT,
        };
        let display_scale = match lookup(DISPLAY_SCALE_VAR) {
            Some(value) => parse_scale(DISPLAY_SCALE_VAR, &value, MAX_DISPLAY_SCALE)?,
            None => DEFAULT_DISPLAY_SCALE,
        };
        let atomic_scale = match lookup(ATOMIC_SCALE_VAR) {
            Some(value) => parse_scale(ATOMIC_SCALE_VAR, &value, MAX_ATOMIC_SCALE)?,
            None => DEFAULT_ATOMIC_SCALE,
        };

        Ok(Self {
            tolerance,
            display_scale,
            atomic_scale,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT,
            display_scale: DEFAULT_DISPLAY_SCALE,
            atomic_scale: DEFAULT_ATOMIC_SCALE,
        }
    }
}

fn parse_tolerance(value: &str) -> Result<Tolerance, ConfigError> {
    value
        .trim()
        .parse::<Decimal>()
        .ok()
        .and_then(|epsilon| Tolerance::new(Money::from_decimal(epsilon)))
        .ok_or_else(|| ConfigError::InvalidEpsilon {
            name: EPSILON_VAR,
            value: value.to_string(),
        })
}

fn parse_scale(name: &'static str, value: &str, max: u32) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|scale| *scale <= max)
        .ok_or_else(|| ConfigError::InvalidScale {
            name,
            value: value.to_string(),
            max,
        })
}
