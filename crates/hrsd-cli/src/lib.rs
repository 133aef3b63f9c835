//! HR Service Desk CLI library

use std::path::PathBuf;

pub mod admin;
pub mod assistant;
pub mod requests;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hrsd")]
#[command(about = "HR Service Desk CLI")]
#[command(version, author, long_about = None)]
pub struct Cli {
    /// Bootstrap store file (defaults to the per-user location)
    #[arg(long = "store", value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a new request
    Submit(requests::SubmitArgs),
    /// List tracked requests, newest first
    List(requests::ListArgs),
    /// Show one request with its attachments
    Show(requests::ShowArgs),
    /// Change the status of a request
    Update(requests::UpdateArgs),
    /// Attach a file to an existing request
    Attach(requests::AttachArgs),
    /// Summarize request volumes
    Dashboard(admin::DashboardArgs),
    /// Inspect or change desk settings
    Settings {
        #[command(subcommand)]
        subcommand: admin::SettingsCommands,
    },
    /// Ask the desk assistant
    Chat(assistant::ChatArgs),
}

/// Open the desk against an explicit bootstrap store or the default one.
pub(crate) fn open_desk(store: Option<PathBuf>) -> anyhow::Result<hrsd_core::DeskService> {
    use anyhow::Context;

    let desk = match store {
        Some(path) => hrsd_core::DeskService::open(&path)
            .with_context(|| format!("Failed to open desk store at {}", path.display()))?,
        None => hrsd_core::DeskService::open_default().context("Failed to open desk store")?,
    };
    Ok(desk)
}

/// Print a problem payload for a rejected input and abort the command.
pub(crate) fn reject_input(error: hrsd_api_contract::ApiContractError) -> anyhow::Error {
    let problem = hrsd_api_contract::ProblemDetails::invalid_input(&error);
    match serde_json::to_string_pretty(&problem) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", error),
    }
    anyhow::anyhow!("Invalid input")
}
