use std::io::Write;

use crate::error::Result;
use crate::models::IssueChanges;
use crate::service::IssueService;

pub fn run(
    issues: &IssueService,
    out: &mut impl Write,
    id: i64,
    changes: &IssueChanges,
) -> Result<()> {
    let issue = issues.update_issue(id, changes)?;
    if changes.is_empty() {
        writeln!(out, "No changes for issue #{}", issue.id)?;
    } else {
        writeln!(out, "Updated issue #{}", issue.id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NewIssue, Priority, Status};

    fn setup_test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_update_title() {
        let db = setup_test_db();
        let issues = IssueService::new(&db);
        let issue = issues.create_issue(NewIssue::new("Original title", "")).unwrap();
        let mut out = Vec::new();

        let changes = IssueChanges::from_input("New title", "", "", "", None).unwrap();
        run(&issues, &mut out, issue.id, &changes).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Updated issue #1\n");
        let loaded = issues.get_issue(issue.id).unwrap().unwrap();
        assert_eq!(loaded.title, "New title");
    }

    #[test]
    fn test_update_nothing_reports_no_changes() {
        let db = setup_test_db();
        let issues = IssueService::new(&db);
        let issue = issues.create_issue(NewIssue::new("Same", "")).unwrap();
        let mut out = Vec::new();

        run(&issues, &mut out, issue.id, &IssueChanges::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No changes for issue #1\n");
    }

    #[test]
    fn test_update_nonexistent_issue() {
        let db = setup_test_db();
        let issues = IssueService::new(&db);
        let mut out = Vec::new();

        let changes = IssueChanges::from_input("New title", "", "", "", None).unwrap();
        let result = run(&issues, &mut out, 99999, &changes);
        assert!(result.unwrap_err().to_string().contains("not found"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_update_unicode_title() {
        let db = setup_test_db();
        let issues = IssueService::new(&db);
        let issue = issues.create_issue(NewIssue::new("Original", "")).unwrap();
        let mut out = Vec::new();

        let changes = IssueChanges::from_input("新しいタイトル 🎉", "", "", "", None).unwrap();
        run(&issues, &mut out, issue.id, &changes).unwrap();

        let loaded = issues.get_issue(issue.id).unwrap().unwrap();
        assert_eq!(loaded.title, "新しいタイトル 🎉");
    }

    #[test]
    fn test_update_status_and_priority() {
        let db = setup_test_db();
        let issues = IssueService::new(&db);
        let issue = issues.create_issue(NewIssue::new("Task", "")).unwrap();
        let mut out = Vec::new();

        let changes = IssueChanges::from_input("", "", "RESOLVED", "Low", None).unwrap();
        run(&issues, &mut out, issue.id, &changes).unwrap();

        let loaded = issues.get_issue(issue.id).unwrap().unwrap();
        assert_eq!(loaded.status, Status::Resolved);
        assert_eq!(loaded.priority, Priority::Low);
    }
}
