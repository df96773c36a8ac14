//! Board configuration from the environment and command line
//!
//! # Environment Variables
//!
//! - `BLOCKWARS_ROWS`: Board rows (default: 8)
//! - `BLOCKWARS_COLS`: Board columns (default: 8)
//! - `BLOCKWARS_SEED`: Generator seed (default: 1)
//! - `BLOCKWARS_PALETTE`: Comma separated colors (default: red,green,yellow,blue)
//!
//! Unparseable environment values fall back to the default with a warning.
//! Values given explicitly through the setters are validated.

use log::warn;
use thiserror::Error;

use crate::types::Palette;

pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;
pub const DEFAULT_SEED: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidDimension { name: &'static str, value: String },
    #[error("seed must be an unsigned 32-bit integer, got {0:?}")]
    InvalidSeed(String),
    #[error("palette {0:?} has no usable colors")]
    EmptyPalette(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: u32,
    pub palette: Palette,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: DEFAULT_SEED,
            palette: Palette::default(),
        }
    }
}

fn parse_dimension(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidDimension {
            name,
            value: value.to_string(),
        }),
    }
}

fn report(key: &str, result: Result<(), ConfigError>) {
    if let Err(err) = result {
        warn!("ignoring {}: {}", key, err);
    }
}

impl GridConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (the environment, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("BLOCKWARS_ROWS") {
            report("BLOCKWARS_ROWS", config.set_rows(&value));
        }
        if let Some(value) = lookup("BLOCKWARS_COLS") {
            report("BLOCKWARS_COLS", config.set_cols(&value));
        }
        if let Some(value) = lookup("BLOCKWARS_SEED") {
            report("BLOCKWARS_SEED", config.set_seed(&value));
        }
        if let Some(value) = lookup("BLOCKWARS_PALETTE") {
            report("BLOCKWARS_PALETTE", config.set_palette(&value));
        }
        config
    }

    pub fn set_rows(&mut self, value: &str) -> Result<(), ConfigError> {
        self.rows = parse_dimension("rows", value)?;
        Ok(())
    }

    pub fn set_cols(&mut self, value: &str) -> Result<(), ConfigError> {
        self.cols = parse_dimension("cols", value)?;
        Ok(())
    }

    pub fn set_seed(&mut self, value: &str) -> Result<(), ConfigError> {
        self.seed = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSeed(value.to_string()))?;
        Ok(())
    }

    pub fn set_palette(&mut self, value: &str) -> Result<(), ConfigError> {
        self.palette =
            Palette::parse_list(value).ok_or_else(|| ConfigError::EmptyPalette(value.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = GridConfig::from_lookup(|_| None);
        assert_eq!(config, GridConfig::default());
        assert_eq!((config.rows, config.cols, config.seed), (8, 8, 1));
    }

    #[test]
    fn reads_all_variables() {
        let config = GridConfig::from_lookup(lookup(&[
            ("BLOCKWARS_ROWS", "5"),
            ("BLOCKWARS_COLS", " 7 "),
            ("BLOCKWARS_SEED", "42"),
            ("BLOCKWARS_PALETTE", "red, blue"),
        ]));
        assert_eq!((config.rows, config.cols, config.seed), (5, 7, 42));
        assert_eq!(config.palette.len(), 2);
    }

    #[test]
    fn bad_variables_fall_back() {
        let config = GridConfig::from_lookup(lookup(&[
            ("BLOCKWARS_ROWS", "0"),
            ("BLOCKWARS_SEED", "-3"),
            ("BLOCKWARS_PALETTE", " , "),
        ]));
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn setters_report_errors() {
        let mut config = GridConfig::default();
        assert_eq!(
            config.set_cols("x"),
            Err(ConfigError::InvalidDimension {
                name: "cols",
                value: "x".to_string()
            })
        );
        assert_eq!(
            config.set_palette(""),
            Err(ConfigError::EmptyPalette(String::new()))
        );
        assert!(config.set_seed("7").is_ok());
        assert_eq!(config.seed, 7);
    }
}
