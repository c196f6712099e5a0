//! Output for each tracker operation. Used by both the interactive menu and
//! the one-shot subcommands.

pub mod comment;
pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;
pub mod user;

use serde::Serialize;
use std::io::Write;

use crate::error::Result;

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
