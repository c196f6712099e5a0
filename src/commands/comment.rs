use std::io::Write;

use crate::error::Result;
use crate::service::IssueService;

use super::write_json;

pub fn add(
    issues: &IssueService,
    out: &mut impl Write,
    issue_id: i64,
    author: &str,
    content: &str,
) -> Result<()> {
    let issue = issues.add_comment_to_issue(issue_id, author, content)?;
    if let Some(comment) = issue.comments.last() {
        writeln!(out, "Added comment #{} to issue #{}", comment.id, issue.id)?;
    }
    Ok(())
}

pub fn list(issues: &IssueService, out: &mut impl Write, issue_id: i64, json: bool) -> Result<()> {
    let comments = issues.get_comments_for_issue(issue_id)?;

    if json {
        return write_json(out, &comments);
    }

    if comments.is_empty() {
        writeln!(out, "No comments.")?;
        return Ok(());
    }

    for comment in comments {
        writeln!(
            out,
            "#{:<4} [{}] {}: {}",
            comment.id,
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.author,
            comment.content
        )?;
    }
    Ok(())
}
