use crate::error::FetchError;
use collection_sync_config::MatchKey;
use collection_sync_models::{CollectionMovie, LibraryMovie};
use collection_sync_sources::LibraryApi;
use std::collections::HashSet;
use tracing::{debug, info};

/// Match key of a collection member
pub fn member_key(match_key: MatchKey, movie: &CollectionMovie) -> String {
    match match_key {
        MatchKey::Title => movie.title.clone(),
        MatchKey::TmdbId => movie.tmdb_id.to_string(),
    }
}

fn held_key(match_key: MatchKey, movie: &LibraryMovie) -> Option<String> {
    match match_key {
        MatchKey::Title => Some(movie.title.clone()),
        // 0 means the service didn't report a catalog id
        MatchKey::TmdbId if movie.tmdb_id > 0 => Some(movie.tmdb_id.to_string()),
        MatchKey::TmdbId => None,
    }
}

/// Point-in-time view of what the library holds, built once per run.
///
/// There is no way to mutate a snapshot after construction; tasks share it through an `Arc`.
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    keys: HashSet<String>,
    held: usize,
    match_key: MatchKey,
}

impl LibrarySnapshot {
    pub fn from_movies(movies: &[LibraryMovie], match_key: MatchKey) -> Self {
        let keys = movies.iter().filter_map(|m| held_key(match_key, m)).collect();
        Self {
            keys,
            held: movies.len(),
            match_key,
        }
    }

    pub fn empty(match_key: MatchKey) -> Self {
        Self {
            keys: HashSet::new(),
            held: 0,
            match_key,
        }
    }

    /// One `GET /api/v3/movie`
    pub async fn fetch(api: &dyn LibraryApi, match_key: MatchKey) -> Result<Self, FetchError> {
        let movies = api.list_movies().await.map_err(FetchError::Library)?;
        let snapshot = Self::from_movies(&movies, match_key);
        info!(
            operation = "snapshot_built",
            held = snapshot.held,
            unique_keys = snapshot.keys.len(),
            match_key = ?match_key,
            "Built library snapshot"
        );
        if snapshot.keys.len() < snapshot.held {
            debug!(
                "{} library movies share a key or have none under {:?} matching",
                snapshot.held - snapshot.keys.len(),
                match_key
            );
        }
        Ok(snapshot)
    }

    pub fn contains(&self, movie: &CollectionMovie) -> bool {
        self.keys.contains(&member_key(self.match_key, movie))
    }

    pub fn key_for(&self, movie: &CollectionMovie) -> String {
        member_key(self.match_key, movie)
    }

    /// Number of library movies the snapshot was built from
    pub fn len(&self) -> usize {
        self.held
    }

    pub fn is_empty(&self) -> bool {
        self.held == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{held, member, MockLibrary};

    #[test]
    fn test_title_matching_is_exact() {
        let snapshot = LibrarySnapshot::from_movies(&[held(1, "Alien", 348)], MatchKey::Title);
        assert!(snapshot.contains(&member("Alien", 348)));
        assert!(!snapshot.contains(&member("alien", 348)));
        assert!(!snapshot.contains(&member("Alien ", 348)));
    }

    #[test]
    fn test_tmdb_matching_ignores_title_differences() {
        let snapshot = LibrarySnapshot::from_movies(&[held(1, "Alien", 348)], MatchKey::TmdbId);
        assert!(snapshot.contains(&member("Alien (1979)", 348)));
        assert!(!snapshot.contains(&member("Alien", 679)));
    }

    #[test]
    fn test_tmdb_matching_skips_unidentified_movies() {
        let snapshot = LibrarySnapshot::from_movies(&[held(1, "Home Video", 0)], MatchKey::TmdbId);
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains(&member("Home Video", 0)));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = LibrarySnapshot::empty(MatchKey::Title);
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains(&member("Alien", 348)));
    }

    #[tokio::test]
    async fn test_fetch_reads_library_once() {
        let api = MockLibrary::new().with_library(vec![held(1, "Alien", 348), held(2, "Aliens", 679)]);
        let snapshot = LibrarySnapshot::fetch(&api, MatchKey::Title).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(&member("Aliens", 679)));
        assert_eq!(api.movie_list_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fetch_error() {
        let api = MockLibrary::new().with_failing_library();
        let err = LibrarySnapshot::fetch(&api, MatchKey::Title).await.unwrap_err();
        assert!(matches!(err, FetchError::Library(_)));
    }
}
