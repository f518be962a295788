use crate::error::AddError;
use collection_sync_models::{AddMovieRequest, CollectionMovie, QualityProfile};
use collection_sync_sources::LibraryApi;
use tracing::{info, warn};

/// Issues the "create and track" call for a missing title.
///
/// Holds only the resolved profile id and root folder; safe to share across tasks.
/// The service does not deduplicate, so callers must only invoke this for titles
/// the snapshot reports as absent.
#[derive(Debug, Clone)]
pub struct MovieAdder {
    quality_profile_id: i64,
    root_folder_path: String,
}

impl MovieAdder {
    pub fn new(profile: &QualityProfile, root_folder_path: impl Into<String>) -> Self {
        Self {
            quality_profile_id: profile.id,
            root_folder_path: root_folder_path.into(),
        }
    }

    pub fn request_for(&self, movie: &CollectionMovie) -> AddMovieRequest {
        AddMovieRequest::monitored(movie, self.quality_profile_id, &self.root_folder_path)
    }

    pub async fn add(&self, api: &dyn LibraryApi, movie: &CollectionMovie) -> Result<(), AddError> {
        let request = self.request_for(movie);
        match api.add_movie(&request).await {
            Ok(()) => {
                info!(
                    operation = "movie_added",
                    title = %movie.title,
                    year = ?movie.year,
                    tmdb_id = movie.tmdb_id,
                    "Successfully added movie"
                );
                Ok(())
            }
            Err(e) => {
                let err = AddError::from_source(&movie.title, e);
                warn!(
                    operation = "movie_add_failed",
                    title = %movie.title,
                    tmdb_id = movie.tmdb_id,
                    error = %err,
                    "Failed to add movie"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{member, MockLibrary};

    fn adder() -> MovieAdder {
        MovieAdder::new(&QualityProfile { id: 6, name: "HD".to_string() }, "/data/movies")
    }

    #[tokio::test]
    async fn test_add_sends_monitored_search_request() {
        let api = MockLibrary::new();
        adder().add(&api, &member("Alien 3", 8077)).await.unwrap();

        let requests = api.add_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.title, "Alien 3");
        assert_eq!(request.quality_profile_id, 6);
        assert_eq!(request.root_folder_path, "/data/movies");
        assert_eq!(request.tmdb_id, 8077);
        assert!(request.monitored);
        assert!(request.add_options.search_for_movie);
    }

    #[tokio::test]
    async fn test_non_created_response_is_add_error() {
        let api = MockLibrary::new().with_rejected_title("Alien 3");
        let err = adder().add(&api, &member("Alien 3", 8077)).await.unwrap_err();
        assert!(matches!(err, AddError::Rejected { status: 400, .. }));
        assert_eq!(api.library_size(), 0);
    }
}
