use crate::error::FetchError;
use collection_sync_models::Collection;
use collection_sync_sources::LibraryApi;
use tracing::info;

/// Fetches the set of collections to reconcile
pub struct CollectionLister<'a> {
    api: &'a dyn LibraryApi,
}

impl<'a> CollectionLister<'a> {
    pub fn new(api: &'a dyn LibraryApi) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Collection>, FetchError> {
        let collections = self.api.list_collections().await.map_err(FetchError::Collections)?;
        info!(
            operation = "collections_listed",
            count = collections.len(),
            "Fetched {} collections",
            collections.len()
        );
        Ok(collections)
    }
}
