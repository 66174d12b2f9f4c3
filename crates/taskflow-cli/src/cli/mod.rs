//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use taskflow_core::types::{MemberRole, TaskPriority, TaskStatus};
use taskflow_core::{ApiClient, FileSessionStore, Session, SessionManager, SharedSession, config};

mod commands;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(version)]
#[command(about = "TaskFlow terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the API base URL (default: config, then http://localhost:5001)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out and erase the persisted session
    Logout,
    /// Show the currently logged-in user
    Whoami,
    /// Register a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
    },
    /// Look up users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage projects and their members
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage tasks within a project
    Tasks {
        /// Project ID the tasks belong to
        #[arg(short, long, value_name = "ID")]
        project: i64,

        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// Search users by name or email
    Search {
        #[arg(value_name = "QUERY")]
        term: String,
    },
}

#[derive(clap::Subcommand)]
enum ProjectCommands {
    /// List your projects
    List,
    /// Show a specific project
    Show {
        #[arg(value_name = "PROJECT_ID")]
        id: i64,
    },
    /// Create a project
    Create {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a project's name or description
    Update {
        #[arg(value_name = "PROJECT_ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete {
        #[arg(value_name = "PROJECT_ID")]
        id: i64,
    },
    /// Manage project members
    Members {
        /// Project ID
        #[arg(short, long, value_name = "ID")]
        project: i64,

        #[command(subcommand)]
        command: MemberCommands,
    },
}

#[derive(clap::Subcommand)]
enum MemberCommands {
    /// List project members
    List,
    /// Add a member with a role (Owner, Member, Viewer)
    Add {
        #[arg(long, value_name = "USER_ID")]
        user: i64,
        #[arg(long, default_value = "Member")]
        role: MemberRole,
    },
    /// Remove a member
    Remove {
        #[arg(value_name = "MEMBER_ID")]
        member: i64,
    },
    /// Change a member's role
    SetRole {
        #[arg(value_name = "MEMBER_ID")]
        member: i64,
        #[arg(long)]
        role: MemberRole,
    },
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// List tasks (optionally one page at a time)
    List {
        #[arg(long, value_name = "N")]
        page: Option<u32>,
        #[arg(long, value_name = "N", default_value_t = 10)]
        page_size: u32,
    },
    /// Show a task with its comments
    Show {
        #[arg(value_name = "TASK_ID")]
        id: i64,
    },
    /// Create a task
    Create {
        #[arg(value_name = "TITLE")]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "Backlog")]
        status: TaskStatus,
        #[arg(long, default_value = "Medium")]
        priority: TaskPriority,
        #[arg(long, value_name = "DATE")]
        due_date: Option<String>,
        #[arg(long, value_name = "USER_ID")]
        assignee: Option<i64>,
    },
    /// Update a task's fields
    Update {
        #[arg(value_name = "TASK_ID")]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long, value_name = "DATE")]
        due_date: Option<String>,
        #[arg(long, value_name = "USER_ID")]
        assignee: Option<i64>,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "TASK_ID")]
        id: i64,
    },
    /// Move a task to a new status (Backlog, InProgress, Review, Done)
    Status {
        #[arg(value_name = "TASK_ID")]
        id: i64,
        #[arg(value_name = "STATUS")]
        status: TaskStatus,
    },
    /// Assign a task to a user
    Assign {
        #[arg(value_name = "TASK_ID")]
        id: i64,
        #[arg(value_name = "USER_ID")]
        user: i64,
    },
    /// Remove a task's assignee
    Unassign {
        #[arg(value_name = "TASK_ID")]
        id: i64,
    },
    /// Search tasks by title or description
    Search {
        #[arg(value_name = "QUERY")]
        term: String,
    },
    /// Manage task comments
    Comments {
        /// Task ID
        #[arg(short, long, value_name = "ID")]
        task: i64,

        #[command(subcommand)]
        command: CommentCommands,
    },
}

#[derive(clap::Subcommand)]
enum CommentCommands {
    /// List comments on a task
    List,
    /// Add a comment
    Add {
        #[arg(value_name = "CONTENT")]
        content: String,
    },
    /// Delete a comment
    Delete {
        #[arg(value_name = "COMMENT_ID")]
        comment: i64,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create a config file with the default template
    Init,
    /// Set the API base URL in the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

/// Everything a command handler needs: the gateway and the session manager,
/// already bootstrapped from the persisted store.
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionManager,
}

impl AppContext {
    /// Gates protected commands on the session snapshot.
    pub fn require_login(&self) -> Result<Session> {
        self.session
            .current()
            .context("Not logged in. Run 'taskflow login' first.")
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TASKFLOW_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config management needs no network or session.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(url),
        };
    }

    let config = config::Config::load().context("load config")?;
    let base_url =
        config::resolve_base_url(cli.api_url.as_deref(), config.api_base_url.as_deref())?;
    tracing::debug!(%base_url, "resolved api base url");

    let shared = SharedSession::default();
    let api = ApiClient::new(base_url, shared.clone());
    let session = SessionManager::new(Box::new(FileSessionStore::at_default_path()), shared);
    session.bootstrap();

    let ctx = AppContext { api, session };

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await
        }
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
            firstname,
            lastname,
        } => {
            commands::auth::register(
                &ctx,
                username,
                email,
                password,
                confirm_password,
                firstname,
                lastname,
            )
            .await
        }
        Commands::Users { command } => match command {
            UserCommands::Search { term } => commands::users::search(&ctx, &term).await,
        },
        Commands::Projects { command } => commands::projects::dispatch(&ctx, command).await,
        Commands::Tasks { project, command } => {
            commands::tasks::dispatch(&ctx, project, command).await
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
