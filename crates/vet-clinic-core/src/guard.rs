//! Ownership guard.
//!
//! Every read-by-id and every mutation passes the loaded resource through
//! [`require_owned`]. The check runs per call and is never cached.

use crate::error::{ClinicError, ClinicResult, ResourceKind};
use crate::models::{Appointment, Pet, Task};

/// Resource held by a single owner.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

impl Owned for Pet {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Appointment {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Task {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Guard verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Compare the requester with the resource owner.
pub fn authorize(requester_id: &str, resource_owner_id: &str) -> Access {
    if requester_id == resource_owner_id {
        Access::Allowed
    } else {
        Access::Denied
    }
}

/// Return the resource if it exists and belongs to `requester_id`.
///
/// Absent resources are `NotFound`; resources of another owner are `Forbidden`.
pub fn require_owned<T: Owned>(
    kind: ResourceKind,
    id: &str,
    found: Option<T>,
    requester_id: &str,
) -> ClinicResult<T> {
    let resource = found.ok_or_else(|| ClinicError::not_found(kind, id))?;
    match authorize(requester_id, resource.owner_id()) {
        Access::Allowed => Ok(resource),
        Access::Denied => {
            tracing::warn!(%kind, id, requester = requester_id, "ownership check denied");
            Err(ClinicError::forbidden(kind, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize() {
        assert_eq!(authorize("alice", "alice"), Access::Allowed);
        assert_eq!(authorize("alice", "bob"), Access::Denied);
    }

    #[test]
    fn test_missing_is_not_found() {
        let err = require_owned::<Pet>(ResourceKind::Pet, "p1", None, "alice").unwrap_err();
        assert!(matches!(err, ClinicError::NotFound { kind: ResourceKind::Pet, .. }));
    }

    #[test]
    fn test_foreign_is_forbidden() {
        let pet = Pet::new("bob".into(), "Rex".into(), "Dog".into());
        let id = pet.id.clone();
        let err = require_owned(ResourceKind::Pet, &id, Some(pet), "alice").unwrap_err();
        assert!(matches!(err, ClinicError::Forbidden { kind: ResourceKind::Pet, .. }));
    }

    #[test]
    fn test_own_is_returned() {
        let pet = Pet::new("alice".into(), "Rex".into(), "Dog".into());
        let id = pet.id.clone();
        let got = require_owned(ResourceKind::Pet, &id, Some(pet), "alice").unwrap();
        assert_eq!(got.id, id);
    }
}
