/// Resource ownership checks
///
/// Taskdeck's authorization model is single-owner: a resource may be read or
/// mutated only by the user that owns it. [`require_owner`] is the one
/// decision point, applied by every task handler after it has confirmed the
/// resource exists — a missing resource is reported as not-found, a foreign
/// one as forbidden, and the order of those checks is part of the contract.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::ownership::require_owner;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// assert!(require_owner(owner, owner).is_ok());
/// assert!(require_owner(Uuid::new_v4(), owner).is_err());
/// ```

use uuid::Uuid;

/// Error type for ownership checks
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    /// The authenticated identity does not own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Accepts the operation iff `identity_id` owns the resource
///
/// # Errors
///
/// Returns `OwnershipError::NotOwner` when the identities differ.
pub fn require_owner(identity_id: Uuid, resource_owner_id: Uuid) -> Result<(), OwnershipError> {
    if identity_id != resource_owner_id {
        return Err(OwnershipError::NotOwner);
    }

    Ok(())
}
