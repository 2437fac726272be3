//! CLI argument parsing for the booking-worker binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "booking-worker", about = "Booking backend worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Import a resource CSV file and print the result as JSON
    Import {
        /// CSV file to import
        file: PathBuf,
        /// JSON file with the custom attribute definitions
        #[arg(long)]
        attributes: Option<PathBuf>,
    },
    /// Render reservations from a JSON file as an Atom feed
    Feed {
        /// JSON file with a list of reservations
        reservations: PathBuf,
    },
}
