use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "chaos")]
#[command(about = "Admin console for the Chaos user directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the admin API
    #[arg(long, global = true, env = "CHAOS_API_URL")]
    pub api_url: Option<String>,

    /// Config file holding the remembered session
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Keep the session after this process exits
        #[arg(long, short = 'r')]
        remember: bool,
    },
    /// Create an operator account
    Register {
        /// Keep the session after this process exits
        #[arg(long, short = 'r')]
        remember: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Email a password reset link
    ForgotPassword { email: String },
    /// Set a new password from a reset link
    ResetPassword {
        /// Token from the reset link
        #[arg(long)]
        token: String,

        #[arg(long)]
        email: String,
    },
    /// List users, one page at a time
    Users(UsersArgs),
    /// Block users by id
    Block {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Unblock users by id
    Unblock {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete users by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every user who never confirmed their email
    DeleteUnverified {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the action history of a user
    History { user_id: String },
    /// Interactive console keeping one session alive
    Shell,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UsersArgs {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    #[arg(long, short = 's', default_value = "10")]
    pub page_size: u32,

    /// Column to sort by, e.g. email or fullName
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}
