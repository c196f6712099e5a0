use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use crate::db::{self, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Issue, NewIssue, Priority, Status};

const ISSUE_COLUMNS: &str =
    "id, title, description, status, priority, assignee_id, created_at, updated_at";

pub struct IssueRepository<'a> {
    conn: &'a Connection,
}

impl<'a> IssueRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { conn: db.conn() }
    }

    pub fn insert(&self, issue: &NewIssue) -> Result<Issue> {
        let now = db::now();
        self.conn.execute(
            "INSERT INTO issues (title, description, status, priority, assignee_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                issue.title,
                issue.description,
                issue.status,
                issue.priority,
                issue.assignee_id,
                now.to_rfc3339()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "Inserted issue");
        Ok(Issue {
            id,
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
            priority: issue.priority,
            assignee_id: issue.assignee_id,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        })
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Issue>> {
        let issue = self
            .conn
            .query_row(
                &format!("SELECT {} FROM issues WHERE id = ?1", ISSUE_COLUMNS),
                [id],
                issue_from_row,
            )
            .optional()?;
        Ok(issue)
    }

    pub fn find_all(&self) -> Result<Vec<Issue>> {
        self.query_where(None, &[])
    }

    pub fn find_by_status(&self, status: Status) -> Result<Vec<Issue>> {
        self.query_where(Some("status = ?1"), &[&status])
    }

    pub fn find_by_priority(&self, priority: Priority) -> Result<Vec<Issue>> {
        self.query_where(Some("priority = ?1"), &[&priority])
    }

    pub fn find_by_assignee(&self, user_id: i64) -> Result<Vec<Issue>> {
        self.query_where(Some("assignee_id = ?1"), &[&user_id])
    }

    /// Write every field of `issue` back to its row and stamp `updated_at`.
    /// Returns false when no row has that id.
    pub fn update(&self, issue: &Issue) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE issues SET title = ?1, description = ?2, status = ?3, priority = ?4, assignee_id = ?5, updated_at = ?6 WHERE id = ?7",
            params![
                issue.title,
                issue.description,
                issue.status,
                issue.priority,
                issue.assignee_id,
                db::now().to_rfc3339(),
                issue.id
            ],
        )?;
        tracing::debug!(id = issue.id, rows, "Updated issue");
        Ok(rows > 0)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM issues WHERE id = ?1", [id])?;
        tracing::debug!(id, rows, "Deleted issue");
        Ok(rows > 0)
    }

    /// Row count, for test assertions.
    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query_where(&self, condition: Option<&str>, params: &[&dyn ToSql]) -> Result<Vec<Issue>> {
        let mut sql = format!("SELECT {} FROM issues", ISSUE_COLUMNS);
        if let Some(condition) = condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let issues = stmt
            .query_map(params, issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(issues)
    }
}

fn issue_from_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        priority: row.get(4)?,
        assignee_id: row.get(5)?,
        created_at: parse_datetime(row, 6)?,
        updated_at: parse_datetime(row, 7)?,
        comments: Vec::new(),
    })
}
