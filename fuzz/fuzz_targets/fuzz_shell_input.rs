#![no_main]

//! Fuzz target for the interactive menu.
//!
//! Operator answers are arbitrary text, so every prompt has to survive
//! malformed numbers, unknown statuses and odd Unicode without panicking.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use issue_tracker::db::Database;
use issue_tracker::shell::Shell;

#[derive(Arbitrary, Debug)]
struct ShellInput {
    /// One answer per prompt, menu choices included
    answers: Vec<String>,
}

fuzz_target!(|input: ShellInput| {
    let db = match Database::open_in_memory() {
        Ok(d) => d,
        Err(_) => return,
    };

    // Seed rows so update, comment and filter paths reach the database
    let _ = db.conn().execute_batch(
        "INSERT INTO users (name, email) VALUES ('Ana', 'ana@example.com');
         INSERT INTO issues (title, description, status, priority, assignee_id, created_at, updated_at)
         VALUES ('Seed', '', 'OPEN', 'Medium', 1, '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00');",
    );

    let script = input.answers.join("\n");
    let mut out = Vec::new();
    let _ = Shell::new(&db, Cursor::new(script), &mut out).run();
});
