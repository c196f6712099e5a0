//! The numbered text menu. Reads one answer per line and hands the parsed
//! input to the same command functions the subcommands use.

use std::io::{BufRead, Write};

use crate::commands::{self, list::ListFilter};
use crate::db::Database;
use crate::error::{Result, TrackerError};
use crate::models::{IssueChanges, NewIssue, Priority, Status};
use crate::service::{IssueService, UserService};

const MENU: &str = "
--- Issue Tracker ---
1. Create User
2. View All Users
3. Create Issue
4. View All Issues
5. Update Issue
6. Delete Issue
7. Filter Issues by Status
8. Filter Issues by Priority
9. Filter Issues by Assigned User
10. Add Comment to Issue
11. View Comments of an Issue
12. Exit";

enum Flow {
    Continue,
    Exit,
}

/// Read an answer or end the session when input runs out.
macro_rules! ask {
    ($shell:expr, $label:expr) => {
        match $shell.prompt($label)? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

pub struct Shell<'a, R, W> {
    users: UserService<'a>,
    issues: IssueService<'a>,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(db: &'a Database, input: R, out: W) -> Self {
        Self {
            users: UserService::new(db),
            issues: IssueService::new(db),
            input,
            out,
        }
    }

    /// Run until the operator exits or input ends. Input and domain errors
    /// are printed and the menu is shown again; storage and terminal errors
    /// end the session.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Session started");
        loop {
            writeln!(self.out, "{}", MENU)?;
            let Some(choice) = self.prompt("Choose option: ")? else {
                break;
            };

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "Session aborted");
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Operation rejected");
                    writeln!(self.out, "Error: {}", e)?;
                }
            }
        }
        tracing::info!("Session ended");
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.create_user(),
            "2" => {
                commands::user::list(&self.users, &mut self.out, false)?;
                Ok(Flow::Continue)
            }
            "3" => self.create_issue(),
            "4" => self.list(ListFilter::All),
            "5" => self.update_issue(),
            "6" => self.delete_issue(),
            "7" => {
                let status: Status = ask!(self, "Enter status to filter: ").parse()?;
                self.list(ListFilter::Status(status))
            }
            "8" => {
                let priority: Priority = ask!(self, "Enter priority to filter: ").parse()?;
                self.list(ListFilter::Priority(priority))
            }
            "9" => {
                let user_id = parse_id("user ID", &ask!(self, "Enter user ID to filter: "))?;
                self.list(ListFilter::Assignee(user_id))
            }
            "10" => self.add_comment(),
            "11" => {
                let issue_id =
                    parse_id("issue ID", &ask!(self, "Enter issue ID to view comments: "))?;
                commands::comment::list(&self.issues, &mut self.out, issue_id, false)?;
                Ok(Flow::Continue)
            }
            "12" => {
                writeln!(self.out, "Exiting...")?;
                Ok(Flow::Exit)
            }
            _ => {
                writeln!(self.out, "Invalid choice. Try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn create_user(&mut self) -> Result<Flow> {
        let name = ask!(self, "Enter name: ");
        let email = ask!(self, "Enter email: ");
        commands::user::add(&self.users, &mut self.out, &name, &email)?;
        Ok(Flow::Continue)
    }

    fn create_issue(&mut self) -> Result<Flow> {
        let title = ask!(self, "Enter title: ");
        let description = ask!(self, "Enter description: ");
        let status = ask!(
            self,
            "Enter status (OPEN, IN_PROGRESS, RESOLVED, CLOSED) [OPEN]: "
        );
        let status = parse_or_default::<Status>(&status)?;
        let priority = ask!(self, "Enter priority (High, Medium, Low) [Medium]: ");
        let priority = parse_or_default::<Priority>(&priority)?;
        let assignee = ask!(self, "Enter assigned user ID (leave blank for none): ");
        let assignee_id = parse_optional_id("assigned user ID", &assignee)?;

        let new = NewIssue {
            title,
            description,
            status,
            priority,
            assignee_id,
        };
        commands::create::run(&self.issues, &mut self.out, new)?;
        Ok(Flow::Continue)
    }

    fn update_issue(&mut self) -> Result<Flow> {
        let id = parse_id("issue ID", &ask!(self, "Enter issue ID to update: "))?;
        let title = ask!(self, "Enter new title (leave blank to keep same): ");
        let description = ask!(self, "Enter new description (leave blank to keep same): ");
        let status = ask!(
            self,
            "Enter new status (OPEN, IN_PROGRESS, RESOLVED, CLOSED, leave blank to keep same): "
        );
        let priority = ask!(
            self,
            "Enter new priority (High, Medium, Low, leave blank to keep same): "
        );
        let assignee = ask!(self, "Enter new assignee ID (leave blank to keep same): ");
        let assignee_id = parse_optional_id("assignee ID", &assignee)?;

        let changes =
            IssueChanges::from_input(&title, &description, &status, &priority, assignee_id)?;
        commands::update::run(&self.issues, &mut self.out, id, &changes)?;
        Ok(Flow::Continue)
    }

    fn delete_issue(&mut self) -> Result<Flow> {
        let id = parse_id("issue ID", &ask!(self, "Enter issue ID to delete: "))?;
        commands::delete::run(&self.issues, &mut self.out, id)?;
        Ok(Flow::Continue)
    }

    fn add_comment(&mut self) -> Result<Flow> {
        let issue_id = parse_id("issue ID", &ask!(self, "Enter issue ID: "))?;
        let author = ask!(self, "Enter your name: ");
        let content = ask!(self, "Enter comment: ");
        commands::comment::add(&self.issues, &mut self.out, issue_id, &author, &content)?;
        Ok(Flow::Continue)
    }

    fn list(&mut self, filter: ListFilter) -> Result<Flow> {
        commands::list::run(&self.issues, &mut self.out, filter, false)?;
        Ok(Flow::Continue)
    }

    /// Print `label` and read one line without its line ending. `None` at
    /// end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

fn parse_id(field: &'static str, input: &str) -> Result<i64> {
    input
        .trim()
        .parse()
        .map_err(|_| TrackerError::InvalidNumber {
            field,
            input: input.trim().to_string(),
        })
}

fn parse_optional_id(field: &'static str, input: &str) -> Result<Option<i64>> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_id(field, input).map(Some)
    }
}

fn parse_or_default<T>(input: &str) -> Result<T>
where
    T: std::str::FromStr<Err = TrackerError> + Default,
{
    if input.trim().is_empty() {
        Ok(T::default())
    } else {
        input.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{CommentRepository, IssueRepository};
    use std::io::Cursor;

    fn run_session(db: &Database, input: &str) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = Shell::new(db, Cursor::new(input.to_string()), &mut out).run();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_choice() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "12\n");
        assert!(result.is_ok());
        assert!(out.contains("--- Issue Tracker ---"));
        assert!(out.contains("Exiting..."));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "1\nAna\n");
        assert!(result.is_ok());
        assert!(!out.contains("Created user"));
        assert!(!out.contains("Exiting..."));
    }

    #[test]
    fn test_create_and_list_users() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "1\nAna\nana@example.com\n2\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Created user #1"));
        assert!(out.contains("ana@example.com"));
    }

    #[test]
    fn test_create_issue_with_defaults() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "3\nBroken footer\nLinks 404\n\n\n\n4\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Created issue #1"));

        let issue = IssueRepository::new(&db).find_by_id(1).unwrap().unwrap();
        assert_eq!(issue.status, Status::Open);
        assert_eq!(issue.priority, Priority::Medium);
        assert_eq!(issue.assignee_id, None);
        assert!(out.contains("Broken footer"));
    }

    #[test]
    fn test_create_issue_with_unknown_assignee() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "3\nTask\n\nOPEN\nHigh\n7\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Error: Referenced user #7 does not exist"));
        assert_eq!(IssueRepository::new(&db).count().unwrap(), 0);
    }

    #[test]
    fn test_create_issue_invalid_status() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "3\nTask\n\nDONE\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Error: Invalid status 'DONE'"));
        assert!(out.contains("Exiting..."));
        assert_eq!(IssueRepository::new(&db).count().unwrap(), 0);
    }

    #[test]
    fn test_invalid_number_returns_to_menu() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "6\nabc\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Error: Invalid number for issue ID: 'abc'"));
        assert!(out.contains("Exiting..."));
    }

    #[test]
    fn test_invalid_choice() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "42\nhello\n12\n");
        assert!(result.is_ok());
        assert_eq!(out.matches("Invalid choice. Try again.").count(), 2);
    }

    #[test]
    fn test_update_with_blank_fields_keeps_values() {
        let db = Database::open_in_memory().unwrap();
        let input = "3\nTitle\nDesc\nIN_PROGRESS\nHigh\n\n5\n1\n\n\nCLOSED\n\n\n12\n";
        let (result, out) = run_session(&db, input);
        assert!(result.is_ok());
        assert!(out.contains("Updated issue #1"));

        let issue = IssueRepository::new(&db).find_by_id(1).unwrap().unwrap();
        assert_eq!(issue.title, "Title");
        assert_eq!(issue.description, "Desc");
        assert_eq!(issue.status, Status::Closed);
        assert_eq!(issue.priority, Priority::High);
    }

    #[test]
    fn test_update_missing_issue() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "5\n9\nNew\n\n\n\n\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Error: Issue #9 not found"));
    }

    #[test]
    fn test_delete_missing_issue_is_not_an_error() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "6\n3\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("No issue #3 to delete"));
        assert!(!out.contains("Error:"));
    }

    #[test]
    fn test_filters() {
        let db = Database::open_in_memory().unwrap();
        let input = concat!(
            "1\nAna\nana@example.com\n",
            "3\nAlpha\n\nOPEN\nHigh\n1\n",
            "3\nBeta\n\nCLOSED\nLow\n\n",
            "7\nCLOSED\n",
            "8\nHigh\n",
            "9\n1\n",
            "12\n"
        );
        let (result, out) = run_session(&db, input);
        assert!(result.is_ok());

        let after_status = &out[out.find("Enter status to filter: ").unwrap()..];
        let status_section = &after_status[..after_status.find("--- Issue Tracker ---").unwrap()];
        assert!(status_section.contains("Beta"));
        assert!(!status_section.contains("Alpha"));

        let after_priority = &out[out.find("Enter priority to filter: ").unwrap()..];
        let priority_section =
            &after_priority[..after_priority.find("--- Issue Tracker ---").unwrap()];
        assert!(priority_section.contains("Alpha"));
        assert!(!priority_section.contains("Beta"));

        let after_user = &out[out.find("Enter user ID to filter: ").unwrap()..];
        let user_section = &after_user[..after_user.find("--- Issue Tracker ---").unwrap()];
        assert!(user_section.contains("Alpha"));
        assert!(!user_section.contains("Beta"));
    }

    #[test]
    fn test_filters_reject_non_canonical_case() {
        let db = Database::open_in_memory().unwrap();
        let input = "3\nAlpha\n\nOPEN\nHigh\n\n7\nopen\n8\nHIGH\n12\n";
        let (result, out) = run_session(&db, input);
        assert!(result.is_ok());

        let after_status = &out[out.find("Enter status to filter: ").unwrap()..];
        let status_section = &after_status[..after_status.find("--- Issue Tracker ---").unwrap()];
        assert!(status_section.contains("Error: Invalid status"));
        assert!(!status_section.contains("Alpha"));

        let after_priority = &out[out.find("Enter priority to filter: ").unwrap()..];
        let priority_section =
            &after_priority[..after_priority.find("--- Issue Tracker ---").unwrap()];
        assert!(priority_section.contains("Error: Invalid priority"));
        assert!(!priority_section.contains("Alpha"));
    }

    #[test]
    fn test_comment_flow() {
        let db = Database::open_in_memory().unwrap();
        let input = "3\nTalk\n\n\n\n\n10\n1\nana\nFirst!\n11\n1\n11\n2\n12\n";
        let (result, out) = run_session(&db, input);
        assert!(result.is_ok());
        assert!(out.contains("Added comment #1 to issue #1"));
        assert!(out.contains("ana: First!"));
        assert!(out.contains("No comments."));
    }

    #[test]
    fn test_comment_on_missing_issue_persists_nothing() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "10\n9\nana\nhello\n12\n");
        assert!(result.is_ok());
        assert!(out.contains("Error: Issue #9 not found"));
        assert_eq!(CommentRepository::new(&db).count().unwrap(), 0);
    }

    #[test]
    fn test_storage_failure_ends_session() {
        crate::logging::init_test_logging();
        let db = Database::open_in_memory().unwrap();
        db.conn().execute_batch("DROP TABLE comments").unwrap();
        let (result, out) = run_session(&db, "11\n1\n12\n");
        assert!(matches!(result, Err(TrackerError::Database(_))));
        assert!(!out.contains("Exiting..."));
    }

    #[test]
    fn test_windows_line_endings() {
        let db = Database::open_in_memory().unwrap();
        let (result, out) = run_session(&db, "1\r\nAna\r\nana@example.com\r\n12\r\n");
        assert!(result.is_ok());
        assert!(out.contains("Created user #1"));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_id("issue ID", " 12 ").unwrap(), 12);
        assert!(parse_id("issue ID", "12a").is_err());
        assert_eq!(parse_optional_id("assignee ID", "  ").unwrap(), None);
        assert_eq!(parse_optional_id("assignee ID", "4").unwrap(), Some(4));
        assert_eq!(parse_or_default::<Status>("").unwrap(), Status::Open);
        assert_eq!(parse_or_default::<Priority>("Low").unwrap(), Priority::Low);
    }
}
