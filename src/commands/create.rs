use std::io::Write;

use crate::error::Result;
use crate::models::NewIssue;
use crate::service::IssueService;

pub fn run(issues: &IssueService, out: &mut impl Write, new: NewIssue) -> Result<()> {
    let issue = issues.create_issue(new)?;
    writeln!(out, "Created issue #{}", issue.id)?;
    Ok(())
}
