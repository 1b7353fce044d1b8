use crate::core::instrument::{Instrument, default_instruments};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const PORT_ENV_VAR: &str = "PORT";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Address to bind, with the port taken from `PORT` when it is set.
    pub fn listen_addr(&self) -> String {
        let port = port_override(std::env::var(PORT_ENV_VAR).ok().as_deref()).unwrap_or(self.port);
        format!("{}:{}", self.host, port)
    }
}

/// Parses a port override, ignoring values that are not a valid port.
fn port_override(value: Option<&str>) -> Option<u16> {
    let value = value?.trim();
    match value.parse::<u16>() {
        Ok(port) => Some(port),
        Err(e) => {
            warn!("Ignoring invalid {PORT_ENV_VAR} value '{value}': {e}");
            None
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            instruments: default_instruments(),
            providers: ProvidersConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the default location, falling back to the
    /// built-in instrument table when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "stockalloc", "stockalloc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the instrument table. Weights are deliberately not required to
    /// sum to 100.
    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            bail!("At least one instrument must be configured");
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            let pct = instrument.allocation_percentage;
            if !pct.is_finite() || pct <= 0.0 || pct > 100.0 {
                bail!(
                    "Invalid allocation_percentage {} for {}: must be in (0, 100]",
                    pct,
                    instrument.ticker
                );
            }
            if !seen.insert(instrument.ticker.as_str()) {
                bail!("Duplicate ticker in configuration: {}", instrument.ticker);
            }
        }
        Ok(())
    }
}
