use crate::error::ResolutionError;
use crate::retry::RetryPolicy;
use collection_sync_models::QualityProfile;
use collection_sync_sources::{LibraryApi, SourceError};
use tracing::{debug, info};

/// Maps a quality-profile name to the service's numeric id
pub struct ProfileResolver<'a> {
    api: &'a dyn LibraryApi,
    retry: RetryPolicy,
}

impl<'a> ProfileResolver<'a> {
    pub fn new(api: &'a dyn LibraryApi, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    /// Transient failures are retried per the policy. An unknown name is not.
    pub async fn resolve(&self, name: &str) -> Result<QualityProfile, ResolutionError> {
        let profiles = self
            .retry
            .run("list_quality_profiles", SourceError::is_transient, || self.api.list_quality_profiles())
            .await
            .map_err(|exhausted| ResolutionError::Unreachable {
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })?;

        debug!(
            available = ?profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "Matching quality profile '{}'",
            name
        );

        match profiles.iter().find(|p| p.matches_name(name)) {
            Some(profile) => {
                info!(
                    operation = "profile_resolved",
                    profile = %profile.name,
                    profile_id = profile.id,
                    "Resolved quality profile"
                );
                Ok(profile.clone())
            }
            None => Err(ResolutionError::ProfileNotFound {
                name: name.to_string(),
                available: profiles.into_iter().map(|p| p.name).collect(),
            }),
        }
    }
}
