use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::entities::screen::Screen;
use crate::infra::fallback::FallbackStrategy;
use crate::infra::http::client::DEFAULT_BASE_URL;
use crate::infra::mock::MockCounts;

pub const API_URL_ENV: &str = "MSP_DESK_API_URL";
pub const TOKEN_ENV: &str = "MSP_DESK_TOKEN";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub fallback: FallbackStrategy,
    pub ticket_page_size: usize,
    pub article_page_size: usize,
    pub mock_ticket_count: usize,
    pub mock_article_count: usize,
    pub log_filter: String,
    /// Serve the snapshot cache instead of the backend.
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: 10,
            fallback: FallbackStrategy::default(),
            ticket_page_size: 10,
            article_page_size: 12,
            mock_ticket_count: MockCounts::default().tickets,
            mock_article_count: MockCounts::default().articles,
            log_filter: "info".to_string(),
            offline: false,
        }
    }
}

impl AppConfig {
    /// A non-empty token is treated as a signed-in session.
    pub fn authenticated(&self) -> bool {
        self.api_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }

    pub fn page_size(&self, screen: Screen) -> usize {
        match screen {
            Screen::Tickets => self.ticket_page_size,
            Screen::Articles => self.article_page_size,
        }
        .max(1)
    }

    pub fn mock_counts(&self) -> MockCounts {
        MockCounts {
            tickets: self.mock_ticket_count,
            articles: self.mock_article_count,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Applies overrides looked up through `lookup`, normally the process
    /// environment. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = present(API_URL_ENV) {
            debug!(url = %url, "api url overridden from environment");
            self.api_base_url = url;
        }
        if let Some(token) = present(TOKEN_ENV) {
            debug!("api token overridden from environment");
            self.api_token = Some(token);
        }
        self
    }
}

/// Reads the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config dir: {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write config: {}", path.display()))
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "mspdesk", "msp-desk")
        .ok_or_else(|| anyhow!("unable to resolve application directories"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

/// Default file plus environment overrides. A first run writes the
/// defaults out so they can be edited.
pub fn load_app_config() -> Result<AppConfig> {
    let path = default_config_path()?;
    let config = load_config(&path)?;
    if !path.exists() {
        if let Err(err) = save_config(&path, &config) {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "failed to write default config"
            );
        }
    }
    Ok(config.with_overrides(|key| std::env::var(key).ok()))
}
