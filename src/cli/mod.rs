//! CLI module - command-line interface for Newsdesk.
//!
//! Running without a subcommand starts the API server.

mod commands;

use clap::{Parser, Subcommand};

/// Newsdesk - newsroom CMS backend
#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an editor or admin account
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// "admin" or any editor role
        #[arg(long, default_value = crate::constants::roles::DEFAULT)]
        role: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Clear the failed-login lock on an account
    UnlockUser {
        /// Username of the locked account
        username: String,
    },
}

pub use commands::*;
