//! User administration.

use ewm_types::Page;

use super::{next, EwmStore};
use crate::{validation::validate, EwmError, NewUser, Result, User};

impl EwmStore {
    // ==================== Users ====================

    /// Registers a user; emails are unique.
    pub fn create_user(&self, input: NewUser) -> Result<User> {
        validate(&input)?;

        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(EwmError::EmailTaken { email: input.email });
        }

        let user = User {
            id: next(&mut tables.seq.user),
            name: input.name,
            email: input.email,
        };
        tables.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Gets a user by id.
    pub fn get_user(&self, id: u64) -> Result<User> {
        self.tables.read().user(id).cloned()
    }

    /// Lists users by id, optionally restricted to `ids`.
    pub fn list_users(&self, ids: &[u64], page: Page) -> Vec<User> {
        let tables = self.tables.read();
        page.apply(
            tables
                .users
                .values()
                .filter(|u| ids.is_empty() || ids.contains(&u.id))
                .cloned(),
        )
    }

    /// Deletes a user that no event, request or comment refers to.
    pub fn delete_user(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write();
        tables.user(id)?;

        let referenced = tables.events.values().any(|e| e.initiator_id == id)
            || tables.requests.values().any(|r| r.requester == id)
            || tables.comments.values().any(|c| c.author_id == id);
        if referenced {
            return Err(EwmError::UserInUse { id });
        }

        tables.users.remove(&id);
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::*;

    #[test]
    fn test_create_and_get() {
        let store = EwmStore::new();
        let user = store.create_user(new_user("alice")).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(store.get_user(1).unwrap(), user);
        assert!(matches!(
            store.get_user(2),
            Err(EwmError::UserNotFound { id: 2 })
        ));
    }

    #[test]
    fn test_duplicate_email() {
        let store = EwmStore::new();
        store.create_user(new_user("alice")).unwrap();
        assert!(matches!(
            store.create_user(new_user("alice")),
            Err(EwmError::EmailTaken { .. })
        ));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let store = EwmStore::new();
        let input = NewUser {
            name: "Bob".into(),
            email: "not-an-email".into(),
        };
        assert!(matches!(
            store.create_user(input),
            Err(EwmError::Validation(_))
        ));
    }

    #[test]
    fn test_list_filters_and_pages() {
        let store = EwmStore::new();
        for name in ["a1", "b2", "c3", "d4"] {
            store.create_user(new_user(name)).unwrap();
        }

        let all = store.list_users(&[], Page::default());
        assert_eq!(all.len(), 4);

        let picked = store.list_users(&[4, 2], Page::default());
        assert_eq!(picked.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 4]);

        let window = store.list_users(&[], Page { from: 1, size: 2 });
        assert_eq!(window.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_delete() {
        let fx = Fixture::published(0, true);
        let stranger = fx.store.create_user(new_user("stranger")).unwrap();
        fx.store.delete_user(stranger.id).unwrap();
        assert!(fx.store.get_user(stranger.id).is_err());

        assert!(matches!(
            fx.store.delete_user(fx.initiator),
            Err(EwmError::UserInUse { .. })
        ));
        assert!(matches!(
            fx.store.delete_user(99),
            Err(EwmError::UserNotFound { .. })
        ));
    }
}
