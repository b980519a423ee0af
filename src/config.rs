//! # Console Configuration
//!
//! Settings come from the environment, optionally seeded from a `.env` file.
//!
//! | Variable | Default |
//! |---|---|
//! | `INVENTORY_STORE` | `memory` (`memory` or `http`) |
//! | `INVENTORY_API_URL` | `http://localhost:8000/api/v1` |
//! | `INVENTORY_PAGE_SIZE` | `10` |
//! | `INVENTORY_STATS_LIMIT` | `100` |
//! | `INVENTORY_SEARCH_DEBOUNCE_MS` | `300` |
//! | `INVENTORY_REPORT_ROWS_PER_PAGE` | `25` |

use crate::dashboard::DashboardSettings;
use crate::export::DEFAULT_ROWS_PER_PAGE;
use crate::framework::MAX_PAGE_LIMIT;
use crate::model::DEFAULT_PAGE_SIZE;
use crate::query::SEARCH_DEBOUNCE;
use crate::stats::DEFAULT_STATS_LIMIT;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const STORE_VAR: &str = "INVENTORY_STORE";
pub const API_URL_VAR: &str = "INVENTORY_API_URL";
pub const PAGE_SIZE_VAR: &str = "INVENTORY_PAGE_SIZE";
pub const STATS_LIMIT_VAR: &str = "INVENTORY_STATS_LIMIT";
pub const SEARCH_DEBOUNCE_VAR: &str = "INVENTORY_SEARCH_DEBOUNCE_MS";
pub const REPORT_ROWS_VAR: &str = "INVENTORY_REPORT_ROWS_PER_PAGE";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

/// Which backend answers store requests.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Memory,
    Http { base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub backend: StoreBackend,
    pub page_size: u32,
    pub stats_limit: u32,
    pub search_debounce: Duration,
    pub report_rows_per_page: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            page_size: DEFAULT_PAGE_SIZE,
            stats_limit: DEFAULT_STATS_LIMIT,
            search_debounce: SEARCH_DEBOUNCE,
            report_rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl ConsoleConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset or blank variables fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let backend = match get(STORE_VAR).as_deref().map(str::trim) {
            None | Some("memory") => StoreBackend::Memory,
            Some("http") => StoreBackend::Http {
                base_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            },
            Some(other) => return Err(invalid(STORE_VAR, other)),
        };

        let page_size: u32 = parse_or(get(PAGE_SIZE_VAR), PAGE_SIZE_VAR, defaults.page_size)?;
        if page_size == 0 || page_size > MAX_PAGE_LIMIT {
            return Err(invalid(PAGE_SIZE_VAR, page_size));
        }
        let stats_limit: u32 =
            parse_or(get(STATS_LIMIT_VAR), STATS_LIMIT_VAR, defaults.stats_limit)?;
        if stats_limit == 0 || stats_limit > MAX_PAGE_LIMIT {
            return Err(invalid(STATS_LIMIT_VAR, stats_limit));
        }
        let debounce_ms: u64 = parse_or(
            get(SEARCH_DEBOUNCE_VAR),
            SEARCH_DEBOUNCE_VAR,
            SEARCH_DEBOUNCE.as_millis() as u64,
        )?;
        let report_rows: usize = parse_or(
            get(REPORT_ROWS_VAR),
            REPORT_ROWS_VAR,
            defaults.report_rows_per_page,
        )?;
        if report_rows == 0 {
            return Err(invalid(REPORT_ROWS_VAR, report_rows));
        }

        let config = Self {
            backend,
            page_size,
            stats_limit,
            search_debounce: Duration::from_millis(debounce_ms),
            report_rows_per_page: report_rows,
        };
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            page_size: self.page_size,
            stats_limit: self.stats_limit,
            search_debounce: self.search_debounce,
            report_rows_per_page: self.report_rows_per_page,
        }
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, raw)),
    }
}
