pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod service;
pub mod shell;

pub use error::{Result, TrackerError};
