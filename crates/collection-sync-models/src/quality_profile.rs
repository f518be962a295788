use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}

impl QualityProfile {
    /// Case-insensitive name comparison, the way the service's UI names are matched
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
