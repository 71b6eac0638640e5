use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobwatch", about = "Freelance job watcher with Telegram notifications")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scheduler and the Telegram command listener until Ctrl-C
    Run {
        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a single cycle and print its report
    Once {
        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage the keyword lists
    Keywords {
        #[command(subcommand)]
        action: KeywordAction,
    },
    /// Show how many links have been notified
    Sent,
    /// Validate configuration and the schedule without running a cycle
    Check,
}

#[derive(Subcommand)]
pub enum KeywordAction {
    /// Add an include keyword
    Add { word: String },
    /// Add an exclude word
    Exclude { word: String },
    /// Remove a word from either list
    Remove { word: String },
    /// Show both lists
    List,
}
