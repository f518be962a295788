use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required setting `{field}` (set it in the config file or via {env})")]
    Missing { field: &'static str, env: &'static str },

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
