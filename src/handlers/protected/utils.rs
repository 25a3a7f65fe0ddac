use tracing::warn;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::{Record, Repository};
use crate::error::ApiError;

/// Fetch a row by the raw path id and check the caller owns it.
///
/// A malformed id or a missing row is 404; a row owned by someone else is 403.
pub async fn load_owned<T: Record>(
    repo: &Repository<T>,
    raw_id: &str,
    user: &AuthUser,
    label: &str,
) -> Result<T, ApiError> {
    let not_found = || ApiError::not_found(format!("{} not found", label));

    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    let record = repo.find(id).await?.ok_or_else(not_found)?;

    if record.owner_id() != user.id {
        warn!("User {} denied access to {} {}", user.id, T::TABLE.name, id);
        return Err(ApiError::forbidden(
            "You do not have permission to access this resource",
        ));
    }

    Ok(record)
}
