use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const TOKEN_ENV_VAR: &str = "TMDB_READ_ACCESS_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the TMDB API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// TMDB v4 read access token sent as a bearer header. An empty value
    /// here falls back to the TMDB_READ_ACCESS_TOKEN environment variable.
    #[serde(default)]
    pub read_access_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level when RUST_LOG is not set (e.g., "info", "debug").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-module overrides appended to the base level, e.g.
    /// [("movie_feed::feed", "debug")].
    #[serde(default)]
    pub module_levels: Vec<(String, String)>,
    /// Directory for the rotating log file. None logs to the console.
    #[serde(default)]
    pub log_directory: Option<String>,
}

fn default_base_url() -> String {
    crate::api::TMDB_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            read_access_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: Vec::new(),
            log_directory: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = Vec::new();

        // 1. Current working directory
        candidates.push(PathBuf::from("config.ron"));

        // 2. Next to executable
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match ron::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config.with_env_token();
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default().with_env_token()
    }

    /// Fill an empty token from the environment so the secret does not have
    /// to live in the config file.
    fn with_env_token(mut self) -> Self {
        if self.api.read_access_token.is_empty()
            && let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            tracing::debug!("Using read access token from {}", TOKEN_ENV_VAR);
            self.api.read_access_token = token;
        }
        self
    }
}
