use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::Database;
use crate::error::Result;
use crate::models::User;

pub struct UserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { conn: db.conn() }
    }

    pub fn insert(&self, name: &str, email: &str) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "Inserted user");
        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                [id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_all(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Row count, for test assertions.
    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup_test_db;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let db = setup_test_db();
        let repo = UserRepository::new(&db);
        let ana = repo.insert("Ana", "ana@example.com").unwrap();
        let bo = repo.insert("Bo", "bo@example.com").unwrap();
        assert!(ana.id > 0);
        assert!(bo.id > ana.id);
    }

    #[test]
    fn test_find_by_id() {
        let db = setup_test_db();
        let repo = UserRepository::new(&db);
        let ana = repo.insert("Ana", "ana@example.com").unwrap();
        assert_eq!(repo.find_by_id(ana.id).unwrap(), Some(ana));
        assert_eq!(repo.find_by_id(999).unwrap(), None);
    }

    #[test]
    fn test_find_all_in_insertion_order() {
        let db = setup_test_db();
        let repo = UserRepository::new(&db);
        for name in ["Carla", "Ana", "Bo"] {
            repo.insert(name, &format!("{}@example.com", name.to_lowercase()))
                .unwrap();
        }
        let names: Vec<_> = repo.find_all().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["Carla", "Ana", "Bo"]);
    }

    #[test]
    fn test_duplicate_email_allowed() {
        let db = setup_test_db();
        let repo = UserRepository::new(&db);
        repo.insert("Ana", "shared@example.com").unwrap();
        repo.insert("Bo", "shared@example.com").unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_exists() {
        let db = setup_test_db();
        let repo = UserRepository::new(&db);
        let ana = repo.insert("Ana", "ana@example.com").unwrap();
        assert!(repo.exists(ana.id).unwrap());
        assert!(!repo.exists(ana.id + 1).unwrap());
    }
}
