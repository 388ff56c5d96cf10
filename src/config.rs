use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub sampler: SamplerConfig,
    pub schedule: ScheduleConfig,
    pub publish: PublishConfig,
    pub logging: LoggingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://play.myfly.club".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SamplerConfig {
    pub min_airport_size: u8, // 1 (airstrip) to 5 (hub)
    pub max_attempts: u32,
    pub retry_delay_ms: u64, // Pause between failed attempts
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_airport_size: 3,
            max_attempts: 200,
            retry_delay_ms: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PublishConfig {
    pub timeout_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>, // Print to stdout when unset
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            webhook_url: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the TOML config at `path`.
    /// If it doesn't exist, creates a default one.
    pub fn load(path: &Path) -> Self {
        let config = if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Config::default()
                }
            }
        } else {
            let default_config = Config::default();

            // Save default config to disk for the user to edit later
            match toml::to_string_pretty(&default_config) {
                Ok(toml_string) => {
                    if fs::write(path, toml_string).is_err() {
                        warn!("Could not write default {} to disk.", path.display());
                    }
                }
                Err(e) => warn!("Could not serialize default config: {}", e),
            }

            info!("Loaded default configuration.");
            default_config
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `MIN_AIRPORT_SIZE`, `MYFLY_WEBHOOK_URL` and `LOG_LEVEL`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = lookup("MIN_AIRPORT_SIZE") {
            match size.trim().parse::<u8>() {
                Ok(parsed) if (1..=5).contains(&parsed) => self.sampler.min_airport_size = parsed,
                _ => warn!("Ignoring invalid MIN_AIRPORT_SIZE={} (expected 1-5)", size),
            }
        }
        if let Some(url) = lookup("MYFLY_WEBHOOK_URL").filter(|u| !u.trim().is_empty()) {
            self.publish.webhook_url = Some(url);
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            self.logging.level = level;
        }
        self
    }
}
