//! Ownership checks for mutating operations.

use uuid::Uuid;

use crate::AppError;

/// An entity with a single owning principal.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Fail with `Forbidden` unless `actor` owns `entity`.
///
/// `action` completes the message "You can only {action}".
pub fn ensure_owner<T: Owned + ?Sized>(entity: &T, actor: Uuid, action: &str) -> Result<(), AppError> {
    if entity.owner_id() == actor {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("You can only {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(Uuid);

    impl Owned for Thing {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        assert!(ensure_owner(&Thing(owner), owner, "edit your own things").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let err = ensure_owner(&Thing(Uuid::new_v4()), Uuid::new_v4(), "edit your own things")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m == "You can only edit your own things"));
    }
}
