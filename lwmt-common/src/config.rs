//! Configuration loading and data folder resolution
//!
//! Resolution order for the data folder:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup: a warning is logged
//! and the defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data folder
pub const ROOT_FOLDER_ENV: &str = "LWMT_ROOT_FOLDER";

/// Environment variable holding the Spoonacular API key
pub const SPOONACULAR_KEY_ENV: &str = "LWMT_SPOONACULAR_API_KEY";

/// Environment variable holding the Google Maps (Places) API key
pub const GOOGLE_MAPS_KEY_ENV: &str = "LWMT_GOOGLE_MAPS_API_KEY";

/// Database file name inside the data folder
pub const DATABASE_FILE: &str = "lwmt.db";

/// Default fixed cap on recipes returned by one search
pub const DEFAULT_RECIPE_RESULT_CAP: u32 = 9;

/// Default nearby-search radius in meters
pub const DEFAULT_PLACES_RADIUS_M: u32 = 10_000;

/// Default map center when geolocation is unavailable (center of the US)
pub const DEFAULT_LATITUDE: f64 = 39.8283;
pub const DEFAULT_LONGITUDE: f64 = -98.5795;

/// Default time a browser's state is kept without a request (24 hours)
pub const DEFAULT_CLIENT_IDLE_SECS: u64 = 24 * 60 * 60;

/// Default period between idle-client sweeps
pub const DEFAULT_CLIENT_SWEEP_SECS: u64 = 5 * 60;

/// Filter used when neither RUST_LOG nor the config file sets one
pub const DEFAULT_LOG_FILTER: &str = "lwmt_kitchen=debug,tower_http=debug";

/// Logging section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// tracing filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Recipe search section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeConfig {
    /// Maximum number of recipes requested per search
    #[serde(default = "default_result_cap")]
    pub result_cap: u32,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RECIPE_RESULT_CAP,
        }
    }
}

fn default_result_cap() -> u32 {
    DEFAULT_RECIPE_RESULT_CAP
}

/// Nearby-places section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacesConfig {
    #[serde(default = "default_radius")]
    pub radius_m: u32,
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_PLACES_RADIUS_M,
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
        }
    }
}

fn default_radius() -> u32 {
    DEFAULT_PLACES_RADIUS_M
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

/// Per-browser state section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Seconds without a request before a browser's state is dropped
    #[serde(default = "default_idle_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_sweep_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: DEFAULT_CLIENT_IDLE_SECS,
            sweep_interval_secs: DEFAULT_CLIENT_SWEEP_SECS,
        }
    }
}

fn default_idle_secs() -> u64 {
    DEFAULT_CLIENT_IDLE_SECS
}

fn default_sweep_secs() -> u64 {
    DEFAULT_CLIENT_SWEEP_SECS
}

/// Contents of `config.toml`
///
/// Every field is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub root_folder: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub spoonacular_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    #[serde(default)]
    pub recipes: RecipeConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub clients: ClientConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load from an explicit path, or from the platform default location
    ///
    /// Missing files and parse errors degrade to defaults with a warning.
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let Some(path) = path else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    info!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(root_folder) = toml_config.root_folder.as_deref() {
        return PathBuf::from(root_folder);
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Locate the platform config file, if one exists
///
/// Linux checks `~/.config/lwmt/config.toml` then `/etc/lwmt/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("lwmt").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/lwmt/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default data folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/lwmt (or /var/lib/lwmt for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("lwmt"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/lwmt"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("lwmt"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/lwmt"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("lwmt"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\lwmt"))
    } else {
        PathBuf::from("./lwmt_data")
    }
}

/// Creates the data folder layout
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the data folder and the per-browser store folder
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.local_store_dir())?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Folder holding one JSON key-value file per browser
    pub fn local_store_dir(&self) -> PathBuf {
        self.root_folder.join("local")
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve an API key from ENV then TOML
///
/// Returns `None` (with a warning) when no source has a usable key; the
/// feature that needs it degrades, the service still starts.
pub fn resolve_api_key(
    name: &str,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<String> {
    let env_key = std::env::var(env_var_name).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k)).map(str::to_string);

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in environment and TOML. Using environment (higher priority).",
            name
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", name);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", name);
        return Some(key);
    }

    warn!(
        "{} API key not configured (set {} or add it to config.toml)",
        name, env_var_name
    );
    None
}
