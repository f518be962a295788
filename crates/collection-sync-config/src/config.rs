use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_URL: &str = "RADARR_URL";
pub const ENV_API_KEY: &str = "RADARR_API_KEY";
pub const ENV_QUALITY_PROFILE: &str = "RADARR_QUALITY_PROFILE";
pub const ENV_ROOT_FOLDER_PATH: &str = "RADARR_ROOT_FOLDER_PATH";
pub const ENV_REFRESH_MINUTES: &str = "RADARR_REFRESH_MINUTES";
pub const ENV_CONCURRENCY: &str = "COLLECTARR_CONCURRENCY";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub radarr: RadarrConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarrConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_quality_profile")]
    pub quality_profile: String,
    #[serde(default = "default_root_folder_path")]
    pub root_folder_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Key used to decide whether a collection member is already held by the library
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    /// Exact display-name equality (compatible with how the service was matched historically)
    #[default]
    Title,
    /// External catalog identifier
    TmdbId,
}

/// When to call the collection detail endpoint for membership
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailFetch {
    #[default]
    Always,
    WhenMissing,
}

/// What a run does when the library listing can't be fetched
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFailurePolicy {
    /// Continue with an empty snapshot. Every member will look missing.
    #[default]
    TreatAsEmpty,
    AbortRun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub match_key: MatchKey,
    #[serde(default)]
    pub detail_fetch: DetailFetch,
    #[serde(default)]
    pub on_snapshot_failure: SnapshotFailurePolicy,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetryBackoff {
    #[default]
    Fixed,
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    #[serde(default)]
    pub backoff: RetryBackoff,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a daily-rotated file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_quality_profile() -> String {
    "Any".to_string()
}

fn default_root_folder_path() -> String {
    "/movies".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_secs() -> u64 {
    5
}

fn default_max_delay_secs() -> u64 {
    60
}

fn default_refresh_minutes() -> u64 {
    10
}

impl Default for RadarrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            quality_profile: default_quality_profile(),
            root_folder_path: default_root_folder_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            match_key: MatchKey::default(),
            detail_fetch: DetailFetch::default(),
            on_snapshot_failure: SnapshotFailurePolicy::default(),
            dry_run: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
            backoff: RetryBackoff::default(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_minutes: default_refresh_minutes(),
            run_on_startup: default_true(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the effective configuration: file (if any), then environment overrides, then validation.
    ///
    /// An explicit `path` must exist. Without one, `default_path` is used when present and
    /// the environment alone is accepted otherwise.
    pub fn load(path: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated(path, default_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::load`] without the final validation, for displaying a broken config
    pub fn load_unvalidated(path: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None if default_path.exists() => Self::load_from_file(default_path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay `RADARR_*` variables. `lookup` is injected so callers (and tests) control the source.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_URL) {
            self.radarr.url = url;
        }
        if let Some(api_key) = non_empty(ENV_API_KEY) {
            self.radarr.api_key = api_key;
        }
        if let Some(profile) = non_empty(ENV_QUALITY_PROFILE) {
            self.radarr.quality_profile = profile;
        }
        if let Some(root) = non_empty(ENV_ROOT_FOLDER_PATH) {
            self.radarr.root_folder_path = root;
        }
        if let Some(minutes) = non_empty(ENV_REFRESH_MINUTES) {
            self.scheduler.refresh_minutes = minutes.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "scheduler.refresh_minutes",
                reason: format!("{} must be a whole number of minutes, got '{}'", ENV_REFRESH_MINUTES, minutes),
            })?;
        }
        if let Some(concurrency) = non_empty(ENV_CONCURRENCY) {
            self.reconcile.concurrency = concurrency.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "reconcile.concurrency",
                reason: format!("{} must be a positive integer, got '{}'", ENV_CONCURRENCY, concurrency),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radarr.url.trim().is_empty() {
            return Err(ConfigError::Missing { field: "radarr.url", env: ENV_URL });
        }
        if !(self.radarr.url.starts_with("http://") || self.radarr.url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "radarr.url",
                reason: format!("'{}' must start with http:// or https://", self.radarr.url),
            });
        }
        if self.radarr.api_key.trim().is_empty() || self.radarr.api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::Missing { field: "radarr.api_key", env: ENV_API_KEY });
        }
        if self.radarr.quality_profile.trim().is_empty() {
            return Err(ConfigError::Missing { field: "radarr.quality_profile", env: ENV_QUALITY_PROFILE });
        }
        if self.radarr.root_folder_path.trim().is_empty() {
            return Err(ConfigError::Missing { field: "radarr.root_folder_path", env: ENV_ROOT_FOLDER_PATH });
        }
        if self.radarr.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "radarr.request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.reconcile.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "reconcile.concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scheduler.refresh_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "scheduler.refresh_minutes",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Copy of the config with the API key hidden, for display
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.radarr.api_key = mask_secret(&self.radarr.api_key);
        masked
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if secret.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("********{}", visible)
    }
}
