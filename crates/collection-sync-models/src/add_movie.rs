use serde::{Deserialize, Serialize};
use crate::movie::CollectionMovie;

/// Body of `POST /api/v3/movie`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub title: String,
    pub quality_profile_id: i64,
    pub monitored: bool,
    pub year: Option<i32>,
    pub tmdb_id: i64,
    pub root_folder_path: String,
    pub add_options: AddOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddOptions {
    pub search_for_movie: bool,
}

impl AddMovieRequest {
    /// Build a monitored, search-on-add request for a collection member
    pub fn monitored(movie: &CollectionMovie, quality_profile_id: i64, root_folder_path: &str) -> Self {
        Self {
            title: movie.title.clone(),
            quality_profile_id,
            monitored: true,
            year: movie.year,
            tmdb_id: movie.tmdb_id,
            root_folder_path: root_folder_path.to_string(),
            add_options: AddOptions { search_for_movie: true },
        }
    }
}
