use std::io::Write;

use crate::error::{Result, TrackerError};
use crate::service::{IssueService, UserService};

pub fn run(
    issues: &IssueService,
    users: &UserService,
    out: &mut impl Write,
    id: i64,
) -> Result<()> {
    let issue = match issues.get_issue_with_comments(id)? {
        Some(i) => i,
        None => return Err(TrackerError::IssueNotFound { id }),
    };

    writeln!(out, "Issue #{}: {}", issue.id, issue.title)?;
    writeln!(out, "Status: {}", issue.status)?;
    writeln!(out, "Priority: {}", issue.priority)?;
    match issue.assignee_id {
        Some(user_id) => match users.get_user_by_id(user_id)? {
            Some(user) => writeln!(out, "Assignee: {} (#{})", user.name, user.id)?,
            None => writeln!(out, "Assignee: #{}", user_id)?,
        },
        None => writeln!(out, "Assignee: (none)")?,
    }
    writeln!(out, "Created: {}", issue.created_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Updated: {}", issue.updated_at.format("%Y-%m-%d %H:%M:%S"))?;

    if !issue.description.is_empty() {
        writeln!(out, "\nDescription:")?;
        for line in issue.description.lines() {
            writeln!(out, "  {}", line)?;
        }
    }

    if !issue.comments.is_empty() {
        writeln!(out, "\nComments:")?;
        for comment in &issue.comments {
            writeln!(
                out,
                "  [{}] {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.content
            )?;
        }
    }

    Ok(())
}
