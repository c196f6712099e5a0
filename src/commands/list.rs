use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::models::{Issue, Priority, Status};
use crate::service::IssueService;

use super::write_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Status(Status),
    Priority(Priority),
    Assignee(i64),
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListFilter::All => write!(f, "all"),
            ListFilter::Status(status) => write!(f, "status {}", status),
            ListFilter::Priority(priority) => write!(f, "priority {}", priority),
            ListFilter::Assignee(user_id) => write!(f, "assignee #{}", user_id),
        }
    }
}

pub fn run(
    issues: &IssueService,
    out: &mut impl Write,
    filter: ListFilter,
    json: bool,
) -> Result<()> {
    let issues = match filter {
        ListFilter::All => issues.view_all_issues()?,
        ListFilter::Status(status) => issues.get_issues_by_status(status)?,
        ListFilter::Priority(priority) => issues.get_issues_by_priority(priority)?,
        ListFilter::Assignee(user_id) => issues.get_issues_by_user_id(user_id)?,
    };
    tracing::debug!(%filter, count = issues.len(), "Listed issues");

    if json {
        return write_json(out, &issues);
    }

    if issues.is_empty() {
        writeln!(out, "No issues found.")?;
        return Ok(());
    }

    for issue in &issues {
        write_row(out, issue)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, issue: &Issue) -> Result<()> {
    let status_display = format!("[{}]", issue.status);
    let assignee = issue
        .assignee_id
        .map(|id| format!("@{}", id))
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "#{:<4} {:13} {:<40} {:6} {:5} {}",
        issue.id,
        status_display,
        truncate(&issue.title, 40),
        issue.priority,
        assignee,
        issue.created_at.format("%Y-%m-%d")
    )?;
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}
