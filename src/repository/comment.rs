use rusqlite::{params, Connection, Row};

use crate::db::{self, parse_datetime, Database};
use crate::error::Result;
use crate::models::Comment;

pub struct CommentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CommentRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { conn: db.conn() }
    }

    pub fn insert(&self, issue_id: i64, author: &str, content: &str) -> Result<Comment> {
        let now = db::now();
        self.conn.execute(
            "INSERT INTO comments (issue_id, author, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![issue_id, author, content, now.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, issue_id, "Inserted comment");
        Ok(Comment {
            id,
            issue_id,
            author: author.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    pub fn find_by_issue(&self, issue_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, issue_id, author, content, created_at FROM comments WHERE issue_id = ?1 ORDER BY id",
        )?;
        let comments = stmt
            .query_map([issue_id], comment_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Row count, for test assertions.
    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        issue_id: row.get(1)?,
        author: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_datetime(row, 4)?,
    })
}
