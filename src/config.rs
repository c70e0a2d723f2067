//! Application-level configuration loading, including the club's default draw settings.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::balancer::{DrawConfig, SkillWeights, config as draw_defaults};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FUTEBOL_BACK_CONFIG_PATH";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SSE_CAPACITY: usize = 16;
const DEFAULT_DRAW_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_STORE_CAPACITY: usize = 10_000;
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub port: u16,
    /// Capacity of each match SSE broadcast channel.
    pub sse_capacity: usize,
    /// Upper bound for persisting and broadcasting one draw; `None` when `draw_timeout_ms` is 0.
    pub draw_timeout: Option<Duration>,
    /// Most matches the in-memory store keeps teams for.
    pub store_capacity: usize,
    /// Deployment label reported by the health check.
    pub environment: String,
    pub(crate) draw: DrawConfig,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    ///
    /// `PORT` in the environment wins over the file.
    pub fn load() -> Self {
        let mut config = Self::from_path(&resolve_config_path());
        if let Some(port) = env::var("PORT").ok().and_then(|value| value.parse().ok()) {
            config.port = port;
        }
        config
    }

    fn from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(app_config) => {
                    info!(path = %path.display(), "loaded configuration");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document, keeping defaults for omitted keys.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let raw = serde_json::from_str::<RawConfig>(contents)?;
        Self::try_from(raw)
    }

    /// Club-wide draw defaults; request overrides are layered on top of a clone of this.
    pub fn draw_config(&self) -> DrawConfig {
        self.draw.clone()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            sse_capacity: DEFAULT_SSE_CAPACITY,
            draw_timeout: Some(DEFAULT_DRAW_TIMEOUT),
            store_capacity: DEFAULT_STORE_CAPACITY,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            draw: DrawConfig::default(),
        }
    }
}

/// Reasons a configuration document is refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid draw defaults: {0}")]
    Draw(#[from] crate::balancer::DrawError),
    #[error("sse_capacity must be positive")]
    ZeroCapacity,
    #[error("store_capacity must be positive")]
    ZeroStoreCapacity,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: u16,
    sse_capacity: usize,
    /// 0 disables the timeout.
    draw_timeout_ms: u64,
    store_capacity: usize,
    environment: String,
    draw: RawDrawDefaults,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            sse_capacity: DEFAULT_SSE_CAPACITY,
            draw_timeout_ms: DEFAULT_DRAW_TIMEOUT.as_millis() as u64,
            store_capacity: DEFAULT_STORE_CAPACITY,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            draw: RawDrawDefaults::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// Draw settings section of the configuration file.
struct RawDrawDefaults {
    teams: usize,
    min_goalkeepers_per_team: usize,
    goalkeeper_threshold: f64,
    hard_goalkeeper_constraint: bool,
    weights: SkillWeights,
}

impl Default for RawDrawDefaults {
    fn default() -> Self {
        Self {
            teams: draw_defaults::DEFAULT_TEAMS,
            min_goalkeepers_per_team: draw_defaults::DEFAULT_MIN_GOALKEEPERS_PER_TEAM,
            goalkeeper_threshold: draw_defaults::DEFAULT_GOALKEEPER_THRESHOLD,
            hard_goalkeeper_constraint: false,
            weights: SkillWeights::default(),
        }
    }
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        if value.sse_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if value.store_capacity == 0 {
            return Err(ConfigError::ZeroStoreCapacity);
        }

        let draw = DrawConfig {
            teams: value.draw.teams,
            min_goalkeepers_per_team: value.draw.min_goalkeepers_per_team,
            goalkeeper_threshold: value.draw.goalkeeper_threshold,
            hard_goalkeeper_constraint: value.draw.hard_goalkeeper_constraint,
            seed: None,
            weights: value.draw.weights,
        };
        draw.validate()?;

        Ok(Self {
            port: value.port,
            sse_capacity: value.sse_capacity,
            draw_timeout: (value.draw_timeout_ms > 0)
                .then(|| Duration::from_millis(value.draw_timeout_ms)),
            store_capacity: value.store_capacity,
            environment: value.environment,
            draw,
        })
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
