//! CLI configuration: TOML file plus `BLINDPOLL_*` environment overrides.

use anyhow::{anyhow, bail, Context, Result};
use blindpoll_core::PollId;
use blindpoll_widget::config::ENV_PREFIX;
use blindpoll_widget::WidgetConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the `blindpoll` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON document holding the store tree
    pub store_path: PathBuf,
    /// Poll inside the document that commands read and vote on
    pub poll_id: PollId,
    /// Widget settings
    pub widget: WidgetConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".blindpoll/poll.json"),
            poll_id: PollId::default(),
            widget: WidgetConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path` if it exists, then apply the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_vars(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the TOML file at `path`, or the defaults if there is none.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `BLINDPOLL_STORE_PATH`, `BLINDPOLL_POLL_ID` and the widget overrides.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let lookup = |suffix: &str| {
            let name = format!("{ENV_PREFIX}{suffix}");
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| value.clone())
        };

        if let Some(value) = lookup("STORE_PATH") {
            self.store_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("POLL_ID") {
            let id = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid value for poll_id: {value:?}"))?;
            self.poll_id = PollId(id);
        }
        self.widget
            .merge_with_vars(vars)
            .map_err(|e| anyhow!("Invalid environment override: {e}"))
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.store_path.as_os_str().is_empty() {
            bail!("store_path must not be empty");
        }
        self.poll_id.check_bounds()?;
        Ok(())
    }
}
