use async_trait::async_trait;
use collection_sync_models::{AddMovieRequest, Collection, LibraryMovie, QualityProfile};
use crate::error::SourceError;

/// The movie-library service as seen by the reconciliation engine.
///
/// Every method is a single request/response round trip. Implementations hold no
/// per-run state, so one instance can be shared across concurrently running tasks.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    // Source metadata
    fn service_name(&self) -> &str;

    // Reads
    async fn list_quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError>;
    async fn list_collections(&self) -> Result<Vec<Collection>, SourceError>;
    async fn get_collection(&self, collection_id: i64) -> Result<Collection, SourceError>;
    async fn list_movies(&self) -> Result<Vec<LibraryMovie>, SourceError>;

    /// Create and track a title. Only an HTTP 201 counts as success.
    async fn add_movie(&self, request: &AddMovieRequest) -> Result<(), SourceError>;
}
