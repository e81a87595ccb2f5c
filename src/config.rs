//! Construction parameters for [`SkipList`](crate::SkipList) and
//! [`ByteStore`](crate::ByteStore).
//!
//! Both parameters are fixed for the lifetime of a structure:
//!
//! - `max_level`: number of forward lanes the sentinel head reserves.
//!   Node heights are drawn from `1..=max_level`.
//! - `probability`: chance that a new node is promoted one more level.
//!   Must lie strictly inside `(0, 1)`.

use std::env;
use std::fmt as StdFmt;

/// Default number of levels.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default promotion probability.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Upper bound on `max_level`.
///
/// With any usable probability, 64 lanes already cover more nodes than the
/// arena can address.
pub const MAX_LEVEL_LIMIT: usize = 64;

/// Environment variable overriding [`Config::max_level`].
pub const ENV_MAX_LEVEL: &str = "BYTESKIP_MAX_LEVEL";

/// Environment variable overriding [`Config::probability`].
pub const ENV_PROBABILITY: &str = "BYTESKIP_PROBABILITY";

// ============================================================================
//  ConfigError
// ============================================================================

/// Errors raised while building a [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Probability outside the open interval `(0, 1)`, or NaN.
    InvalidProbability(f64),

    /// `max_level` is zero or above [`MAX_LEVEL_LIMIT`].
    InvalidMaxLevel(usize),

    /// An environment override could not be parsed.
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

impl StdFmt::Display for ConfigError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::InvalidProbability(p) => {
                write!(f, "probability must be between 0 and 1 (exclusive), got {p}")
            }

            Self::InvalidMaxLevel(n) => {
                write!(f, "max level must be in 1..={MAX_LEVEL_LIMIT}, got {n}")
            }

            Self::InvalidEnv { var, value } => {
                write!(f, "cannot parse {var}={value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
//  Config
// ============================================================================

/// Validated skip list parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_level: usize,
    probability: f64,
}

impl Config {
    /// Build a config, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidProbability`] unless `0 < probability < 1`
    ///   (NaN fails both comparisons and is rejected).
    /// - [`ConfigError::InvalidMaxLevel`] unless `1 <= max_level <= 64`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byteskip::{Config, ConfigError};
    ///
    /// assert!(Config::new(16, 0.5).is_ok());
    /// assert_eq!(Config::new(16, 1.0), Err(ConfigError::InvalidProbability(1.0)));
    /// assert!(Config::new(16, f64::NAN).is_err());
    /// ```
    pub fn new(max_level: usize, probability: f64) -> Result<Self, ConfigError> {
        let config = Self {
            max_level,
            probability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default config with environment overrides applied.
    ///
    /// Reads [`ENV_MAX_LEVEL`] and [`ENV_PROBABILITY`]; unset variables keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidEnv`] if a variable is set but unparsable, or
    /// any validation error from [`Config::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// [`Config::from_env`] over an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_level = match lookup(ENV_MAX_LEVEL) {
            Some(raw) => parse_env(ENV_MAX_LEVEL, &raw)?,
            None => DEFAULT_MAX_LEVEL,
        };

        let probability = match lookup(ENV_PROBABILITY) {
            Some(raw) => parse_env(ENV_PROBABILITY, &raw)?,
            None => DEFAULT_PROBABILITY,
        };

        Self::new(max_level, probability)
    }

    /// Check both parameters.
    ///
    /// # Errors
    ///
    /// See [`Config::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written so that NaN falls through to the error.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(ConfigError::InvalidProbability(self.probability));
        }

        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(ConfigError::InvalidMaxLevel(self.max_level));
        }

        Ok(())
    }

    /// Number of levels reserved in the sentinel head.
    #[inline]
    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.max_level
    }

    /// Promotion probability.
    #[inline]
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Fail fast in tests")]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.max_level(), DEFAULT_MAX_LEVEL);
        assert!((config.probability() - DEFAULT_PROBABILITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probability_bounds() {
        assert_eq!(
            Config::new(8, 0.0),
            Err(ConfigError::InvalidProbability(0.0))
        );
        assert_eq!(
            Config::new(8, 1.0),
            Err(ConfigError::InvalidProbability(1.0))
        );
        assert!(Config::new(8, -0.25).is_err());
        assert!(Config::new(8, 1.5).is_err());
        assert!(Config::new(8, f64::INFINITY).is_err());
        assert!(Config::new(8, f64::NEG_INFINITY).is_err());

        assert!(Config::new(8, 0.5).is_ok());
        assert!(Config::new(8, f64::MIN_POSITIVE).is_ok());
        assert!(Config::new(8, 0.999).is_ok());
    }

    #[test]
    fn test_nan_probability_rejected() {
        let err = Config::new(8, f64::NAN).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidProbability(p) if p.is_nan()));
    }

    #[test]
    fn test_max_level_bounds() {
        assert_eq!(Config::new(0, 0.5), Err(ConfigError::InvalidMaxLevel(0)));
        assert_eq!(
            Config::new(MAX_LEVEL_LIMIT + 1, 0.5),
            Err(ConfigError::InvalidMaxLevel(MAX_LEVEL_LIMIT + 1))
        );

        assert_eq!(Config::new(1, 0.5).unwrap().max_level(), 1);
        assert_eq!(
            Config::new(MAX_LEVEL_LIMIT, 0.5).unwrap().max_level(),
            MAX_LEVEL_LIMIT
        );
    }

    #[test]
    fn test_parse_env_values() {
        assert_eq!(parse_env::<usize>(ENV_MAX_LEVEL, " 12 ").unwrap(), 12);
        assert!((parse_env::<f64>(ENV_PROBABILITY, "0.25").unwrap() - 0.25).abs() < f64::EPSILON);

        let err = parse_env::<usize>(ENV_MAX_LEVEL, "twelve").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_MAX_LEVEL,
                value: "twelve".to_string(),
            }
        );
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            pairs
                .iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_from_lookup_unset_keeps_defaults() {
        assert_eq!(Config::from_lookup(vars(&[])).unwrap(), Config::default());

        let config = Config::from_lookup(vars(&[(ENV_MAX_LEVEL, "8")])).unwrap();
        assert_eq!(config.max_level(), 8);
        assert!((config.probability() - DEFAULT_PROBABILITY).abs() < f64::EPSILON);

        let config = Config::from_lookup(vars(&[(ENV_PROBABILITY, "0.25")])).unwrap();
        assert_eq!(config.max_level(), DEFAULT_MAX_LEVEL);
        assert!((config.probability() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lookup_unparsable_value() {
        assert_eq!(
            Config::from_lookup(vars(&[(ENV_PROBABILITY, "abc")])),
            Err(ConfigError::InvalidEnv {
                var: ENV_PROBABILITY,
                value: "abc".to_string(),
            })
        );
        assert_eq!(
            Config::from_lookup(vars(&[(ENV_MAX_LEVEL, "-1"), (ENV_PROBABILITY, "0.5")])),
            Err(ConfigError::InvalidEnv {
                var: ENV_MAX_LEVEL,
                value: "-1".to_string(),
            })
        );
    }

    #[test]
    fn test_from_lookup_validates_parsed_values() {
        assert_eq!(
            Config::from_lookup(vars(&[(ENV_MAX_LEVEL, "0")])),
            Err(ConfigError::InvalidMaxLevel(0))
        );
        assert_eq!(
            Config::from_lookup(vars(&[(ENV_PROBABILITY, "1.5")])),
            Err(ConfigError::InvalidProbability(1.5))
        );
        assert!(matches!(
            Config::from_lookup(vars(&[(ENV_PROBABILITY, "NaN")])),
            Err(ConfigError::InvalidProbability(p)) if p.is_nan()
        ));
    }

    #[test]
    fn test_from_env_matches_process_environment() {
        let expected = Config::from_lookup(|var| env::var(var).ok());
        assert_eq!(format!("{:?}", Config::from_env()), format!("{expected:?}"));
    }

    #[test]
    fn test_error_display() {
        let msg = ConfigError::InvalidProbability(1.0).to_string();
        assert!(msg.contains("between 0 and 1"), "{msg}");

        let msg = ConfigError::InvalidMaxLevel(0).to_string();
        assert!(msg.contains("max level"), "{msg}");
    }
}
