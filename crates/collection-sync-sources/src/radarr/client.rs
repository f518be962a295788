use crate::error::SourceError;
use crate::radarr::api;
use crate::traits::LibraryApi;
use async_trait::async_trait;
use collection_sync_config::RadarrConfig;
use collection_sync_models::{AddMovieRequest, Collection, LibraryMovie, QualityProfile};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;

/// Radarr v3 HTTP client. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct RadarrClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for RadarrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarrClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RadarrClient {
    pub fn new(base_url: &str, api_key: &str, request_timeout: Duration) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| SourceError::InvalidConfig("API key contains invalid header characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-api-key"), key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .user_agent(concat!("collectarr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &RadarrConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.url,
            &config.api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LibraryApi for RadarrClient {
    fn service_name(&self) -> &str {
        "radarr"
    }

    async fn list_quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        api::get_quality_profiles(&self.client, &self.base_url).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, SourceError> {
        api::get_collections(&self.client, &self.base_url).await
    }

    async fn get_collection(&self, collection_id: i64) -> Result<Collection, SourceError> {
        api::get_collection(&self.client, &self.base_url, collection_id).await
    }

    async fn list_movies(&self) -> Result<Vec<LibraryMovie>, SourceError> {
        api::get_movies(&self.client, &self.base_url).await
    }

    async fn add_movie(&self, request: &AddMovieRequest) -> Result<(), SourceError> {
        api::add_movie(&self.client, &self.base_url, request).await
    }
}
