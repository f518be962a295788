pub mod config;
pub mod error;
pub mod paths;

pub use config::{Config, DetailFetch, LoggingConfig, MatchKey, RadarrConfig, ReconcileConfig, RetryBackoff, RetryConfig, SchedulerConfig, SnapshotFailurePolicy};
pub use error::ConfigError;
pub use paths::{PathManager, container_base_path};
