use collection_sync_sources::SourceError;
use serde::Serialize;
use thiserror::Error;

/// The quality profile could not be resolved. Nothing can be added without it, so this is fatal.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("quality profile '{name}' not found (available: {})", .available.join(", "))]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("could not list quality profiles after {attempts} attempt(s): {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: SourceError,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch library movies: {0}")]
    Library(#[source] SourceError),

    #[error("failed to fetch collections: {0}")]
    Collections(#[source] SourceError),

    #[error("failed to fetch collection '{title}' (id {id}): {source}")]
    CollectionDetail {
        id: i64,
        title: String,
        #[source]
        source: SourceError,
    },
}

#[derive(Debug, Error)]
pub enum AddError {
    #[error("service rejected '{title}' with HTTP {status}: {body}")]
    Rejected { title: String, status: u16, body: String },

    #[error("failed to add '{title}': {source}")]
    Request {
        title: String,
        #[source]
        source: SourceError,
    },
}

impl AddError {
    pub fn from_source(title: &str, source: SourceError) -> Self {
        match source {
            SourceError::Status { status, body, .. } => Self::Rejected {
                title: title.to_string(),
                status,
                body,
            },
            other => Self::Request {
                title: title.to_string(),
                source: other,
            },
        }
    }
}

/// Something went wrong inside a collection task itself rather than in a request it made
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("reconciliation task for '{collection}' panicked: {message}")]
    Panicked { collection: String, message: String },

    #[error("reconciliation task for '{collection}' was cancelled")]
    Cancelled { collection: String },
}

/// Why a single collection task did not produce an outcome
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Task(#[from] TaskError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fetch,
    Add,
    Task,
}

/// A recorded, non-fatal failure. `context` names the collection or movie involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
    pub kind: FailureKind,
    pub context: String,
    pub message: String,
}

impl RunFailure {
    pub fn fetch(context: impl Into<String>, err: &FetchError) -> Self {
        Self {
            kind: FailureKind::Fetch,
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn add(context: impl Into<String>, err: &AddError) -> Self {
        Self {
            kind: FailureKind::Add,
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn task(context: impl Into<String>, err: &TaskError) -> Self {
        Self {
            kind: FailureKind::Task,
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn collection(context: impl Into<String>, err: &CollectionError) -> Self {
        match err {
            CollectionError::Fetch(e) => Self::fetch(context, e),
            CollectionError::Task(e) => Self::task(context, e),
        }
    }
}
