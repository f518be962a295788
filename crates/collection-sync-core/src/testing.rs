//! In-memory library service for exercising the engine without a network.

use async_trait::async_trait;
use collection_sync_models::{AddMovieRequest, Collection, CollectionMovie, LibraryMovie, QualityProfile};
use collection_sync_sources::{LibraryApi, SourceError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn member(title: &str, tmdb_id: i64) -> CollectionMovie {
    CollectionMovie {
        title: title.to_string(),
        year: Some(2000),
        tmdb_id,
    }
}

pub fn held(id: i64, title: &str, tmdb_id: i64) -> LibraryMovie {
    LibraryMovie {
        id,
        title: title.to_string(),
        year: Some(2000),
        tmdb_id,
        monitored: true,
    }
}

pub fn collection(id: i64, title: &str, members: Vec<CollectionMovie>) -> Collection {
    Collection {
        id,
        title: title.to_string(),
        tmdb_id: None,
        monitored: false,
        movies: members,
    }
}

fn unavailable(endpoint: &str) -> SourceError {
    SourceError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

/// Mock implementation of [`LibraryApi`].
///
/// Successful additions are appended to the library, so a second run sees them.
pub struct MockLibrary {
    profiles: Vec<QualityProfile>,
    collections: Vec<Collection>,
    listing_includes_members: bool,
    library: Mutex<Vec<LibraryMovie>>,

    profile_failures_remaining: AtomicU32,
    fail_library: bool,
    fail_collection_list: bool,
    fail_detail_ids: HashSet<i64>,
    panic_detail_ids: HashSet<i64>,
    reject_titles: HashSet<String>,
    detail_delay: Duration,

    pub profile_calls: AtomicUsize,
    pub collection_list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub movie_list_calls: AtomicUsize,
    pub add_requests: Mutex<Vec<AddMovieRequest>>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self {
            profiles: vec![
                QualityProfile { id: 1, name: "Any".to_string() },
                QualityProfile { id: 4, name: "HD-1080p".to_string() },
            ],
            collections: Vec::new(),
            listing_includes_members: false,
            library: Mutex::new(Vec::new()),
            profile_failures_remaining: AtomicU32::new(0),
            fail_library: false,
            fail_collection_list: false,
            fail_detail_ids: HashSet::new(),
            panic_detail_ids: HashSet::new(),
            reject_titles: HashSet::new(),
            detail_delay: Duration::ZERO,
            profile_calls: AtomicUsize::new(0),
            collection_list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            movie_list_calls: AtomicUsize::new(0),
            add_requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<QualityProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_collections(mut self, collections: Vec<Collection>) -> Self {
        self.collections = collections;
        self
    }

    /// Have the listing endpoint return members too (by default only the detail endpoint does)
    pub fn with_members_in_listing(mut self) -> Self {
        self.listing_includes_members = true;
        self
    }

    pub fn with_library(self, movies: Vec<LibraryMovie>) -> Self {
        *self.library.lock().unwrap() = movies;
        self
    }

    /// Fail the profile listing with a 503 this many times before answering
    pub fn with_profile_failures(self, failures: u32) -> Self {
        self.profile_failures_remaining.store(failures, Ordering::SeqCst);
        self
    }

    pub fn with_failing_library(mut self) -> Self {
        self.fail_library = true;
        self
    }

    pub fn with_failing_collection_list(mut self) -> Self {
        self.fail_collection_list = true;
        self
    }

    pub fn with_failing_detail(mut self, collection_id: i64) -> Self {
        self.fail_detail_ids.insert(collection_id);
        self
    }

    pub fn with_panicking_detail(mut self, collection_id: i64) -> Self {
        self.panic_detail_ids.insert(collection_id);
        self
    }

    pub fn with_rejected_title(mut self, title: &str) -> Self {
        self.reject_titles.insert(title.to_string());
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    pub fn added_titles(&self) -> Vec<String> {
        self.add_requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    pub fn add_call_count(&self) -> usize {
        self.add_requests.lock().unwrap().len()
    }

    pub fn library_size(&self) -> usize {
        self.library.lock().unwrap().len()
    }
}

#[async_trait]
impl LibraryApi for MockLibrary {
    fn service_name(&self) -> &str {
        "mock"
    }

    async fn list_quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.profile_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.profile_failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(unavailable("/api/v3/qualityProfile"));
        }
        Ok(self.profiles.clone())
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, SourceError> {
        self.collection_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_collection_list {
            return Err(unavailable("/api/v3/collection"));
        }
        Ok(self
            .collections
            .iter()
            .map(|c| {
                let mut listed = c.clone();
                if !self.listing_includes_members {
                    listed.movies.clear();
                }
                listed
            })
            .collect())
    }

    async fn get_collection(&self, collection_id: i64) -> Result<Collection, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_detail_ids.contains(&collection_id) {
            panic!("mock detail handler blew up for collection {}", collection_id);
        }
        if self.fail_detail_ids.contains(&collection_id) {
            return Err(unavailable("/api/v3/collection/{id}"));
        }
        self.collections
            .iter()
            .find(|c| c.id == collection_id)
            .cloned()
            .ok_or_else(|| SourceError::Status {
                endpoint: format!("/api/v3/collection/{}", collection_id),
                status: 404,
                body: "NotFound".to_string(),
            })
    }

    async fn list_movies(&self) -> Result<Vec<LibraryMovie>, SourceError> {
        self.movie_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_library {
            return Err(unavailable("/api/v3/movie"));
        }
        Ok(self.library.lock().unwrap().clone())
    }

    async fn add_movie(&self, request: &AddMovieRequest) -> Result<(), SourceError> {
        self.add_requests.lock().unwrap().push(request.clone());
        if self.reject_titles.contains(&request.title) {
            return Err(SourceError::Status {
                endpoint: "/api/v3/movie".to_string(),
                status: 400,
                body: "MovieExistsValidator".to_string(),
            });
        }
        let mut library = self.library.lock().unwrap();
        let id = library.len() as i64 + 1000;
        library.push(LibraryMovie {
            id,
            title: request.title.clone(),
            year: request.year,
            tmdb_id: request.tmdb_id,
            monitored: request.monitored,
        });
        Ok(())
    }
}
