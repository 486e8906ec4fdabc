use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use crate::store::autosave::DEFAULT_AUTOSAVE_INTERVAL;
use crate::store::persist::DEFAULT_STORAGE_KEY;

pub const ENV_STORAGE_KEY: &str = "WRITELY_STORAGE_KEY";
pub const ENV_AUTOSAVE_INTERVAL_SECS: &str = "WRITELY_AUTOSAVE_INTERVAL_SECS";
pub const ENV_AUTOSAVE: &str = "WRITELY_AUTOSAVE";
pub const ENV_DATA_DIR: &str = "WRITELY_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub storage_key: String,
    pub autosave_interval: Duration,
    pub enable_autosave: bool,
    /// Directory for file-backed draft storage. Without one the editor keeps
    /// its draft in memory only.
    pub data_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            enable_autosave: true,
            data_dir: None,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_STORAGE_KEY) {
            config.storage_key = raw.trim().to_owned();
        }
        if let Some(raw) = get(ENV_AUTOSAVE_INTERVAL_SECS) {
            config.autosave_interval = parse_interval_secs(&raw)
                .with_context(|| format!("invalid {ENV_AUTOSAVE_INTERVAL_SECS}={raw:?}"))?;
        }
        if let Some(raw) = get(ENV_AUTOSAVE) {
            config.enable_autosave = parse_switch(&raw).with_context(|| {
                format!("invalid {ENV_AUTOSAVE}={raw:?}. expected one of: on, off, true, false, 1, 0")
            })?;
        }
        if let Some(raw) = get(ENV_DATA_DIR) {
            config.data_dir = Some(PathBuf::from(raw.trim()));
        }

        Ok(config)
    }
}

pub fn parse_interval_secs(raw: &str) -> anyhow::Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("autosave interval must be a whole number of seconds")?;
    if secs == 0 {
        anyhow::bail!("autosave interval must be positive");
    }
    Ok(Duration::from_secs(secs))
}

pub fn parse_switch(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => anyhow::bail!("unsupported switch value: {other}"),
    }
}
