use crate::error::SourceError;
use collection_sync_models::{AddMovieRequest, Collection, LibraryMovie, QualityProfile};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

pub const QUALITY_PROFILE_PATH: &str = "/api/v3/qualityProfile";
pub const COLLECTION_PATH: &str = "/api/v3/collection";
pub const MOVIE_PATH: &str = "/api/v3/movie";

/// Join a base URL and an API path without doubling slashes
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

async fn get_json<T: DeserializeOwned>(client: &Client, base_url: &str, path: &str) -> Result<T, SourceError> {
    let url = endpoint_url(base_url, path);
    trace!(url = %url, "GET");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| SourceError::transport(path, &e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| SourceError::Decode {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

/// Fetch quality profiles
pub async fn get_quality_profiles(client: &Client, base_url: &str) -> Result<Vec<QualityProfile>, SourceError> {
    let profiles: Vec<QualityProfile> = get_json(client, base_url, QUALITY_PROFILE_PATH).await?;
    debug!("Fetched {} quality profiles", profiles.len());
    Ok(profiles)
}

/// Fetch all collections
pub async fn get_collections(client: &Client, base_url: &str) -> Result<Vec<Collection>, SourceError> {
    let collections: Vec<Collection> = get_json(client, base_url, COLLECTION_PATH).await?;
    debug!("Fetched {} collections", collections.len());
    Ok(collections)
}

/// Fetch one collection including its member list
pub async fn get_collection(client: &Client, base_url: &str, collection_id: i64) -> Result<Collection, SourceError> {
    let path = format!("{}/{}", COLLECTION_PATH, collection_id);
    get_json(client, base_url, &path).await
}

/// Fetch every movie currently in the library
pub async fn get_movies(client: &Client, base_url: &str) -> Result<Vec<LibraryMovie>, SourceError> {
    let movies: Vec<LibraryMovie> = get_json(client, base_url, MOVIE_PATH).await?;
    debug!("Fetched {} library movies", movies.len());
    Ok(movies)
}

/// Create a movie. The service answers 201 Created on success; anything else is an error,
/// including 400 responses for titles that already exist.
pub async fn add_movie(client: &Client, base_url: &str, request: &AddMovieRequest) -> Result<(), SourceError> {
    let url = endpoint_url(base_url, MOVIE_PATH);
    trace!(url = %url, title = %request.title, tmdb_id = request.tmdb_id, "POST");

    let response = client
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|e| SourceError::transport(MOVIE_PATH, &e))?;

    let status = response.status();
    if status != StatusCode::CREATED {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            endpoint: MOVIE_PATH.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(())
}
