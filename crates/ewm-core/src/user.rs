//! Users.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// The public part of a user, embedded in events and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserShort {
    pub id: u64,
    pub name: String,
}

impl From<&User> for UserShort {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Input for registering a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 2, max = 250), custom(function = "not_blank"))]
    pub name: String,
    #[validate(email, length(min = 6, max = 254))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_new_user_validation() {
        let ok = NewUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        };
        assert!(validate(&ok).is_ok());

        let bad_email = NewUser {
            email: "alice".into(),
            ..ok.clone()
        };
        assert!(validate(&bad_email).is_err());

        let short_name = NewUser {
            name: "A".into(),
            ..ok
        };
        assert!(validate(&short_name).is_err());
    }
}
