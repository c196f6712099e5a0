use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::io;
use std::path::PathBuf;

use issue_tracker::commands::{self, list::ListFilter};
use issue_tracker::config;
use issue_tracker::db::Database;
use issue_tracker::logging;
use issue_tracker::models::{IssueChanges, NewIssue};
use issue_tracker::service::{IssueService, UserService};
use issue_tracker::shell::Shell;

#[derive(Parser)]
#[command(name = "issue-tracker")]
#[command(about = "A small single-user issue tracker")]
#[command(version)]
struct Cli {
    /// Database file (defaults to the nearest .issue-tracker/issues.db)
    #[arg(long, global = true, env = "ISSUE_TRACKER_DB")]
    db: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "ISSUE_TRACKER_LOG_JSON")]
    log_json: bool,

    /// Print lists as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Shell,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Create a new issue
    Create {
        /// Issue title
        title: String,
        /// Issue description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Status (OPEN, IN_PROGRESS, RESOLVED, CLOSED)
        #[arg(short, long, default_value = "OPEN")]
        status: String,
        /// Priority (High, Medium, Low)
        #[arg(short, long, default_value = "Medium")]
        priority: String,
        /// Assigned user ID
        #[arg(short, long)]
        assignee: Option<i64>,
    },

    /// List issues, optionally filtered by one field
    List {
        /// Filter by status
        #[arg(short, long, conflicts_with_all = ["priority", "assignee"])]
        status: Option<String>,
        /// Filter by priority
        #[arg(short, long, conflicts_with = "assignee")]
        priority: Option<String>,
        /// Filter by assigned user ID
        #[arg(short, long)]
        assignee: Option<i64>,
    },

    /// Show issue details with its comments
    Show {
        /// Issue ID
        id: i64,
    },

    /// Update an issue; omitted fields keep their value
    Update {
        /// Issue ID
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New status
        #[arg(short, long)]
        status: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New assigned user ID
        #[arg(short, long)]
        assignee: Option<i64>,
    },

    /// Delete an issue
    Delete {
        /// Issue ID
        id: i64,
    },

    /// Add a comment to an issue
    Comment {
        /// Issue ID
        id: i64,
        /// Comment text
        text: String,
        /// Comment author
        #[arg(short, long, env = "ISSUE_TRACKER_AUTHOR")]
        author: String,
    },

    /// List the comments of an issue
    Comments {
        /// Issue ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user
    Add {
        /// Display name
        name: String,
        /// Email address
        email: String,
    },
    /// List all users
    List,
    /// Show a user and the issues assigned to them
    Show {
        /// User ID
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet, cli.log_json) {
        eprintln!("{}", e);
    }

    let cwd = env::current_dir()?;
    let db_path = config::resolve_db_path(cli.db.as_deref(), &cwd)?;
    let db = Database::open(&db_path).context("Failed to open database")?;
    let users = UserService::new(&db);
    let issues = IssueService::new(&db);
    let mut out = io::stdout().lock();
    let json = cli.json;

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => Shell::new(&db, io::stdin().lock(), &mut out).run(),

        Commands::User { action } => match action {
            UserCommands::Add { name, email } => {
                commands::user::add(&users, &mut out, &name, &email)
            }
            UserCommands::List => commands::user::list(&users, &mut out, json),
            UserCommands::Show { id } => commands::user::show(&users, &issues, &mut out, id),
        },

        Commands::Create {
            title,
            description,
            status,
            priority,
            assignee,
        } => {
            let new = NewIssue {
                title,
                description,
                status: status.parse()?,
                priority: priority.parse()?,
                assignee_id: assignee,
            };
            commands::create::run(&issues, &mut out, new)
        }

        Commands::List {
            status,
            priority,
            assignee,
        } => {
            let filter = match (status, priority, assignee) {
                (Some(status), _, _) => ListFilter::Status(status.parse()?),
                (_, Some(priority), _) => ListFilter::Priority(priority.parse()?),
                (_, _, Some(user_id)) => ListFilter::Assignee(user_id),
                _ => ListFilter::All,
            };
            commands::list::run(&issues, &mut out, filter, json)
        }

        Commands::Show { id } => commands::show::run(&issues, &users, &mut out, id),

        Commands::Update {
            id,
            title,
            description,
            status,
            priority,
            assignee,
        } => {
            let changes = IssueChanges::from_input(
                title.as_deref().unwrap_or_default(),
                description.as_deref().unwrap_or_default(),
                status.as_deref().unwrap_or_default(),
                priority.as_deref().unwrap_or_default(),
                assignee,
            )?;
            if changes.is_empty() {
                bail!(
                    "Nothing to update. Use --title, --description, --status, --priority or --assignee"
                );
            }
            commands::update::run(&issues, &mut out, id, &changes)
        }

        Commands::Delete { id } => commands::delete::run(&issues, &mut out, id),

        Commands::Comment { id, text, author } => {
            commands::comment::add(&issues, &mut out, id, &author, &text)
        }

        Commands::Comments { id } => commands::comment::list(&issues, &mut out, id, json),
    };

    result?;
    Ok(())
}
