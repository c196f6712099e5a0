use std::io::Write;

use crate::error::Result;
use crate::service::IssueService;

/// Deleting an id that does not exist is not an error.
pub fn run(issues: &IssueService, out: &mut impl Write, id: i64) -> Result<()> {
    if issues.delete_issue_by_id(id)? {
        writeln!(out, "Deleted issue #{}", id)?;
    } else {
        writeln!(out, "No issue #{} to delete", id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::NewIssue;

    #[test]
    fn test_delete_existing_issue() {
        let db = Database::open_in_memory().unwrap();
        let issues = IssueService::new(&db);
        let issue = issues.create_issue(NewIssue::new("To delete", "")).unwrap();
        let mut out = Vec::new();

        run(&issues, &mut out, issue.id).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Deleted issue #1\n");
        assert!(issues.get_issue(issue.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_nonexistent_issue() {
        let db = Database::open_in_memory().unwrap();
        let issues = IssueService::new(&db);
        issues.create_issue(NewIssue::new("Keep me", "")).unwrap();
        let mut out = Vec::new();

        run(&issues, &mut out, 99999).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No issue #99999 to delete\n");
        assert_eq!(issues.view_all_issues().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_multiple_issues() {
        let db = Database::open_in_memory().unwrap();
        let issues = IssueService::new(&db);
        let id1 = issues.create_issue(NewIssue::new("Issue 1", "")).unwrap().id;
        let id2 = issues.create_issue(NewIssue::new("Issue 2", "")).unwrap().id;
        let id3 = issues.create_issue(NewIssue::new("Issue 3", "")).unwrap().id;
        let mut out = Vec::new();

        run(&issues, &mut out, id1).unwrap();
        run(&issues, &mut out, id2).unwrap();

        let remaining = issues.view_all_issues().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, id3);
    }
}
