use std::collections::HashSet;

use super::db::{Database, DatabaseError};
use super::models::User;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    pub fn get_all_users(&self) -> Result<Vec<User>, DatabaseError> {
        self.users().lock()?.load()
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.get_all_users()?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    /// Append a user with a freshly allocated ID.
    ///
    /// Returns `None` without touching the file when the username is taken.
    pub fn insert_user(
        &self,
        username: &str,
        password_hash: String,
        permission_level: i64,
    ) -> Result<Option<User>, DatabaseError> {
        let guard = self.users().lock()?;
        let mut users: Vec<User> = guard.load()?;

        if users.iter().any(|u| u.username == username) {
            return Ok(None);
        }

        let existing: HashSet<u64> = users.iter().map(|u| u.id).collect();
        let user = User {
            id: self.allocate_id(&existing, None)?,
            password_hash,
            permission_level,
            username: username.to_string(),
        };

        users.push(user.clone());
        guard.store(&users)?;
        Ok(Some(user))
    }
}
