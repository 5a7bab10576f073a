//! Ownership gate for mutating a business or anything it owns.

use models::{business, user};

use crate::auth::errors::AuthError;

pub fn ensure_owner(business: &business::Model, caller: &user::Model) -> Result<(), AuthError> {
    if business.owner_id == caller.id {
        Ok(())
    } else {
        tracing::warn!(business_id = business.id, owner_id = business.owner_id, caller_id = caller.id, "ownership_check_failed");
        Err(AuthError::NotOwner)
    }
}
