use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_dev_env")]
    pub dev_env: String,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

fn default_dev_env() -> String {
    "dev".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    /// Card Games Engine address, without a trailing path.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LoggingFormatConfig,
    pub levels: LoggingLevelsConfig,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingFormatConfig {
    pub show_time: bool,
    /// One JSON object per line instead of the human formatter.
    #[serde(default)]
    pub json: bool,
    pub location: LoggingLocationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLocationConfig {
    pub show_file: bool,
    pub show_line: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLevelsConfig {
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
    pub critical: bool,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct RedactionConfig {
    #[serde(default = "true_default")]
    pub enabled: bool,
    #[serde(default)]
    pub patterns: Vec<RedactionPattern>,
}

fn true_default() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedactionPattern {
    pub name: String,
    pub regex: String,
    pub placeholder: String,
}

static CONFIG: RwLock<Option<&'static AppConfig>> = RwLock::new(None);

/// Load once and cache for the life of the process.
pub fn get_config() -> Result<&'static AppConfig, ConfigError> {
    if let Some(cfg) = *CONFIG.read().unwrap_or_else(|e| e.into_inner()) {
        return Ok(cfg);
    }

    let mut write = CONFIG.write().unwrap_or_else(|e| e.into_inner());
    if let Some(cfg) = *write {
        return Ok(cfg);
    }

    let cfg: &'static AppConfig = Box::leak(Box::new(load_config()?));
    *write = Some(cfg);
    Ok(cfg)
}

#[cfg(test)]
pub fn reset_config() {
    let mut write = CONFIG.write().unwrap();
    *write = None;
}

/// Resolve `name` next to the crate manifest when running under cargo,
/// otherwise relative to the current directory, then under `crates/cli/`
/// for repo-root execution.
fn config_file(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let base_path = Path::new(&manifest_dir);
    if base_path.join(name).exists() {
        return base_path.join(name);
    }
    let local = Path::new(name);
    if local.exists() {
        return local.to_path_buf();
    }
    Path::new("crates").join("cli").join(name)
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        // Built-in defaults so the binary works from any directory
        .set_default("dev_env", "dev")?
        .set_default("backend.base_url", deck_engine::platform::DEFAULT_BASE_URL)?
        .set_default("logging.verbose", false)?
        .set_default("logging.format.show_time", true)?
        .set_default("logging.format.location.show_file", false)?
        .set_default("logging.format.location.show_line", false)?
        .set_default("logging.levels.debug", false)?
        .set_default("logging.levels.info", false)?
        .set_default("logging.levels.warning", true)?
        .set_default("logging.levels.error", true)?
        .set_default("logging.levels.critical", true)?
        // Shipped defaults
        .add_source(File::from(config_file("global_config.yaml")).required(false))
        // Load production config if in prod
        .add_source(File::from(config_file("production_config.yaml")).required(false))
        // Load local override
        .add_source(File::from(config_file(".global_config.yaml")).required(false))
        // Map nested env vars like APP__BACKEND__BASE_URL=http://host:8000
        .add_source(Environment::with_prefix("APP").separator("__"));

    builder.build()?.try_deserialize()
}
