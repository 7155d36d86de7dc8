//! Authorization predicates
//!
//! Every mutating operation on an owned resource evaluates the ownership
//! predicate before touching the store. Read endpoints are either public or
//! scoped to the authenticated principal in the query itself.

use crate::error::{AppError, Result};
use uuid::Uuid;

/// Require that the requester owns the resource.
pub fn require_owner(owner_id: Uuid, requester_id: Uuid, resource: &str) -> Result<()> {
    if owner_id != requester_id {
        return Err(AppError::Forbidden(format!(
            "only the owner may modify this {}",
            resource
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let id = Uuid::new_v4();
        assert!(require_owner(id, id, "post").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let result = require_owner(Uuid::new_v4(), Uuid::new_v4(), "notification");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
