//! Boot configuration – reads `robot.toml` once at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rmc_types::{Life, Mode};
use serde::{Deserialize, Serialize};

/// Static robot configuration.  Every field has a default, so an empty or
/// partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Life state at boot.  Defaults to `dead`.
    #[serde(default)]
    pub initial_life: Life,

    /// Mode at boot.  Defaults to `driving`.
    #[serde(default)]
    pub default_mode: Mode,

    /// Operator link timeout in milliseconds.  `0` disables the watchdog.
    #[serde(default = "default_link_timeout_ms")]
    pub link_timeout_ms: u64,

    /// Snapshot broadcast period in milliseconds.
    #[serde(default = "default_telemetry_interval_ms")]
    pub telemetry_interval_ms: u64,

    /// Snapshots buffered per subscriber before it lags.
    #[serde(default = "default_snapshot_channel_capacity")]
    pub snapshot_channel_capacity: usize,
}

fn default_link_timeout_ms() -> u64 {
    1000
}
fn default_telemetry_interval_ms() -> u64 {
    250
}
fn default_snapshot_channel_capacity() -> usize {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_life: Life::default(),
            default_mode: Mode::default(),
            link_timeout_ms: default_link_timeout_ms(),
            telemetry_interval_ms: default_telemetry_interval_ms(),
            snapshot_channel_capacity: default_snapshot_channel_capacity(),
        }
    }
}

impl Config {
    /// `None` when the watchdog is disabled.
    pub fn link_timeout(&self) -> Option<Duration> {
        (self.link_timeout_ms > 0).then(|| Duration::from_millis(self.link_timeout_ms))
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_interval_ms)
    }
}

/// `$RMC_CONFIG`, or `robot.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var("RMC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("robot.toml"))
}

/// Load the config from disk and apply environment overrides.  Returns
/// `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Defaults with `RMC_*` overrides applied.  Used when the file is missing
/// or unreadable.
pub fn defaults_with_env() -> Config {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg);
    cfg
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `RMC_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `RMC_INITIAL_LIFE` | `initial_life` |
/// | `RMC_DEFAULT_MODE` | `default_mode` |
/// | `RMC_LINK_TIMEOUT_MS` | `link_timeout_ms` |
/// | `RMC_TELEMETRY_INTERVAL_MS` | `telemetry_interval_ms` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("RMC_INITIAL_LIFE")
        && let Ok(life) = v.parse::<Life>()
    {
        cfg.initial_life = life;
    }
    if let Ok(v) = std::env::var("RMC_DEFAULT_MODE")
        && let Ok(mode) = v.parse::<Mode>()
    {
        cfg.default_mode = mode;
    }
    if let Ok(v) = std::env::var("RMC_LINK_TIMEOUT_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.link_timeout_ms = ms;
    }
    if let Ok(v) = std::env::var("RMC_TELEMETRY_INTERVAL_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.telemetry_interval_ms = ms;
    }
}
