//! Business rules on top of the repositories: input validation, existence
//! checks for referenced rows and partial-update merging.

mod issue;
mod user;

pub use issue::IssueService;
pub use user::UserService;

use crate::error::{Result, TrackerError};
use crate::models::non_blank;

fn require(field: &'static str, value: &str) -> Result<()> {
    match non_blank(Some(value)) {
        Some(_) => Ok(()),
        None => Err(TrackerError::validation(field, "must not be blank")),
    }
}
