use crate::db::Database;
use crate::error::{Result, TrackerError};
use crate::models::{Comment, Issue, IssueChanges, NewIssue, Priority, Status};
use crate::repository::{CommentRepository, IssueRepository, UserRepository};

use super::require;

pub struct IssueService<'a> {
    db: &'a Database,
    issues: IssueRepository<'a>,
    comments: CommentRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> IssueService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            issues: IssueRepository::new(db),
            comments: CommentRepository::new(db),
            users: UserRepository::new(db),
        }
    }

    /// Title and description are stored trimmed.
    pub fn create_issue(&self, new: NewIssue) -> Result<Issue> {
        let new = NewIssue {
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            ..new
        };
        require("title", &new.title)?;
        if let Some(user_id) = new.assignee_id {
            self.check_assignee(user_id)?;
        }

        let issue = self.issues.insert(&new)?;
        tracing::info!(
            id = issue.id,
            status = %issue.status,
            priority = %issue.priority,
            assignee = ?issue.assignee_id,
            "Created issue"
        );
        Ok(issue)
    }

    pub fn view_all_issues(&self) -> Result<Vec<Issue>> {
        self.issues.find_all()
    }

    pub fn get_issue(&self, id: i64) -> Result<Option<Issue>> {
        self.issues.find_by_id(id)
    }

    /// Load an issue and fill its comment list from storage.
    pub fn get_issue_with_comments(&self, id: i64) -> Result<Option<Issue>> {
        let Some(mut issue) = self.issues.find_by_id(id)? else {
            return Ok(None);
        };
        for comment in self.comments.find_by_issue(id)? {
            issue.add_comment(comment);
        }
        Ok(Some(issue))
    }

    /// Apply a partial update. The read, merge and write happen in one
    /// transaction; an empty change set performs no write.
    pub fn update_issue(&self, id: i64, changes: &IssueChanges) -> Result<Issue> {
        let tx = self.db.conn().unchecked_transaction()?;

        let mut issue = self
            .issues
            .find_by_id(id)?
            .ok_or(TrackerError::IssueNotFound { id })?;

        if changes.is_empty() {
            return Ok(issue);
        }
        if let Some(user_id) = changes.assignee_id {
            self.check_assignee(user_id)?;
        }

        issue.apply(changes);
        self.issues.update(&issue)?;
        let updated = self
            .issues
            .find_by_id(id)?
            .ok_or(TrackerError::IssueNotFound { id })?;
        tx.commit()?;

        tracing::info!(id, status = %updated.status, priority = %updated.priority, "Updated issue");
        Ok(updated)
    }

    /// Returns false when there was nothing to delete.
    pub fn delete_issue_by_id(&self, id: i64) -> Result<bool> {
        let deleted = self.issues.delete(id)?;
        if deleted {
            tracing::info!(id, "Deleted issue");
        }
        Ok(deleted)
    }

    pub fn get_issues_by_status(&self, status: Status) -> Result<Vec<Issue>> {
        self.issues.find_by_status(status)
    }

    pub fn get_issues_by_priority(&self, priority: Priority) -> Result<Vec<Issue>> {
        self.issues.find_by_priority(priority)
    }

    pub fn get_issues_by_user_id(&self, user_id: i64) -> Result<Vec<Issue>> {
        self.issues.find_by_assignee(user_id)
    }

    /// Persist a comment and return the issue with that comment attached.
    /// Only the new comment is attached; earlier comments are not loaded.
    /// Author and content are stored trimmed.
    pub fn add_comment_to_issue(
        &self,
        issue_id: i64,
        author: &str,
        content: &str,
    ) -> Result<Issue> {
        require("author", author)?;
        require("content", content)?;

        let mut issue = self
            .issues
            .find_by_id(issue_id)?
            .ok_or(TrackerError::IssueNotFound { id: issue_id })?;

        let comment = self
            .comments
            .insert(issue_id, author.trim(), content.trim())?;
        tracing::info!(id = comment.id, issue_id, "Added comment");
        issue.add_comment(comment);
        Ok(issue)
    }

    pub fn get_comments_for_issue(&self, issue_id: i64) -> Result<Vec<Comment>> {
        self.comments.find_by_issue(issue_id)
    }

    fn check_assignee(&self, user_id: i64) -> Result<()> {
        if self.users.exists(user_id)? {
            Ok(())
        } else {
            Err(TrackerError::ReferenceNotFound {
                entity: "user",
                id: user_id,
            })
        }
    }
}
