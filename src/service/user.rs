use crate::db::Database;
use crate::error::{Result, TrackerError};
use crate::models::User;
use crate::repository::UserRepository;

use super::require;

pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    /// Emails are not required to be unique.
    pub fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim();
        require("name", name)?;
        require("email", email)?;
        if !email.contains('@') {
            return Err(TrackerError::validation(
                "email",
                format!("'{}' is not an email address", email),
            ));
        }

        let user = self.users.insert(name, email)?;
        tracing::info!(id = user.id, "Created user");
        Ok(user)
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.users.find_by_id(id)
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.users.find_all()
    }
}
