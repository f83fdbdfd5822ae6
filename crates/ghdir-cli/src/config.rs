use std::path::PathBuf;
use std::time::Duration;

use ghdir::Translator;
use ghdir::link::{DEFAULT_API_BASE, DEFAULT_BROWSE_BASE};
use ghdir_github::GitHubClientConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the mirrored directory is created in.
    pub output_dir: PathBuf,
    pub max_concurrent_downloads: usize,
    pub http: HttpConfig,
    pub github: GitHubConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            max_concurrent_downloads: ghdir::DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            http: HttpConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let client = GitHubClientConfig::default();
        Self {
            user_agent: client.user_agent,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            timeout_secs: client.timeout.as_secs(),
        }
    }
}

impl HttpConfig {
    pub fn client_config(&self) -> GitHubClientConfig {
        GitHubClientConfig {
            user_agent: self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Hosts used to recognise browse URLs and reach the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub browse_base_url: String,
    pub api_base_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            browse_base_url: DEFAULT_BROWSE_BASE.into(),
            api_base_url: DEFAULT_API_BASE.into(),
        }
    }
}

impl GitHubConfig {
    pub fn translator(&self) -> Translator {
        Translator::new(&self.browse_base_url, &self.api_base_url)
    }
}

/// Config file path: `~/.config/ghdir/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ghdir").join("config.toml"))
}

/// Load config from file, falling back to defaults if missing or invalid.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                return config;
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
            }
        }
    }

    AppConfig::default()
}
