//! Profile lookup shared by every use case

use crate::domain::repository::ProfileDirectory;
use crate::domain::value_objects::{ProfileId, Username};
use crate::error::{EngagementError, EngagementResult};

/// Canonicalize `raw` and resolve it to a profile id.
///
/// Invalid usernames are rejected before touching the store.
pub async fn resolve_profile<P>(directory: &P, raw: &str) -> EngagementResult<ProfileId>
where
    P: ProfileDirectory,
{
    let username = Username::parse(raw)?;

    match directory.find_profile_id(&username).await? {
        Some(profile_id) => Ok(profile_id),
        None => {
            tracing::debug!(username = %username, "Profile not found");
            Err(EngagementError::ProfileNotFound)
        }
    }
}
