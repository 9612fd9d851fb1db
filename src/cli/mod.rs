//! CLI for the legisfeed service
//!
//! Subcommands:
//! - `serve`: run the HTTP API server
//! - `ingest`: run one ingestion pass and exit (the hook an external
//!   scheduler calls when it prefers a process over the HTTP trigger)

pub mod ingest;
pub mod serve;

use clap::{Parser, Subcommand};

/// Legislative bill feed API
#[derive(Parser)]
#[command(name = "legisfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Run a single ingestion pass and exit
    Ingest(ingest::IngestArgs),
}
