use std::io::Write;

use crate::error::{Result, TrackerError};
use crate::service::{IssueService, UserService};

use super::write_json;

pub fn add(users: &UserService, out: &mut impl Write, name: &str, email: &str) -> Result<()> {
    let user = users.create_user(name, email)?;
    writeln!(out, "Created user #{}", user.id)?;
    Ok(())
}

pub fn list(users: &UserService, out: &mut impl Write, json: bool) -> Result<()> {
    let users = users.get_all_users()?;

    if json {
        return write_json(out, &users);
    }

    if users.is_empty() {
        writeln!(out, "No users found.")?;
        return Ok(());
    }

    for user in users {
        writeln!(out, "#{:<4} {:<24} {}", user.id, user.name, user.email)?;
    }
    Ok(())
}

pub fn show(
    users: &UserService,
    issues: &IssueService,
    out: &mut impl Write,
    id: i64,
) -> Result<()> {
    let user = users
        .get_user_by_id(id)?
        .ok_or(TrackerError::UserNotFound { id })?;

    writeln!(out, "User #{}: {}", user.id, user.name)?;
    writeln!(out, "Email: {}", user.email)?;

    let assigned = issues.get_issues_by_user_id(user.id)?;
    if assigned.is_empty() {
        writeln!(out, "Assigned: (none)")?;
    } else {
        writeln!(out, "Assigned:")?;
        for issue in assigned {
            writeln!(out, "  #{:<4} [{}] {}", issue.id, issue.status, issue.title)?;
        }
    }
    Ok(())
}
