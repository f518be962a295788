use serde::{Deserialize, Serialize};

/// A desired title, as a member of a collection. Not yet identified by the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMovie {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub tmdb_id: i64,
}

/// A held title, as present in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub tmdb_id: i64,
    #[serde(default)]
    pub monitored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_movie_ignores_unknown_fields() {
        let json = r#"{
            "id": 12,
            "title": "Alien",
            "year": 1979,
            "tmdbId": 348,
            "monitored": true,
            "hasFile": true,
            "sizeOnDisk": 123456
        }"#;
        let movie: LibraryMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 12);
        assert_eq!(movie.tmdb_id, 348);
        assert!(movie.monitored);
    }

    #[test]
    fn test_collection_movie_without_year() {
        let json = r#"{"title": "Untitled Sequel", "tmdbId": 99}"#;
        let movie: CollectionMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.year, None);
        assert_eq!(movie.tmdb_id, 99);
    }
}
