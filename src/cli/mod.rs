//! CLI module - Command-line interface for Barkeep accounts
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Barkeep - accounts and saved searches for the code review server
#[derive(Parser)]
#[command(name = "barkeep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API server
    #[command(alias = "-d", alias = "--daemon", alias = "daemon")]
    Serve,

    /// Create an account and print its API credentials
    CreateUser {
        /// Email address, also used for the avatar
        email: String,
        /// Display name
        username: String,
        /// Grant admin permission
        #[arg(long)]
        admin: bool,
    },

    /// List the saved searches of an account
    #[command(alias = "ls")]
    ListSearches {
        /// Email address of the account
        email: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
