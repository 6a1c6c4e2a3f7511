//! # tare-config
//!
//! Layered configuration loading for Tare using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TARE_*` prefix, `__` as separator)
//! 2. Project-level `tare.toml`
//! 3. User-level `~/.config/tare/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TARE_BOARD__MAX_STDDEV` -> `board.max_stddev`,
//! `TARE_STORE__LOG_PATH` -> `store.log_path`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tare_config::TareConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = TareConfig::load_with_dotenv().expect("config");
//!
//! println!("log path: {}", config.store.log_path);
//! ```

mod attribution;
mod board;
mod error;
mod general;
mod store;
mod sync;

pub use attribution::AttributionConfig;
pub use board::BoardConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TareConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl TareConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`TARE_*` prefix)
    /// 2. `tare.toml` (project-local)
    /// 3. `~/.config/tare/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` before building the figment. This is the typical
    /// entry point for the daemon binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or stack additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("tare.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TARE_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tare").join("config.toml"))
    }
}
