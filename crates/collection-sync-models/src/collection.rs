use serde::{Deserialize, Serialize};
use crate::movie::CollectionMovie;

/// A curated set of related titles (e.g. a film series) as reported by the library service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub monitored: bool,
    // The listing endpoint may omit members; the detail endpoint always includes them
    #[serde(default)]
    pub movies: Vec<CollectionMovie>,
}

impl Collection {
    pub fn has_members(&self) -> bool {
        !self.movies.is_empty()
    }
}
