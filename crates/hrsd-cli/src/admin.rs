//! Administrative commands: dashboard and settings.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use hrsd_api_contract::{validation, SettingsInput};
use hrsd_core::SettingsRecord;

use crate::{open_desk, reject_input};

/// Arguments for the dashboard summary
#[derive(Args)]
pub struct DashboardArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl DashboardArgs {
    /// Execute the summary
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let desk = open_desk(store)?;
        let summary = desk.dashboard()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("Total requests: {}", summary.total);
        println!("By status:");
        for entry in &summary.by_status {
            println!("  {:<12} {}", entry.status.as_str(), entry.count);
        }
        if !summary.by_category.is_empty() {
            println!("Busiest categories:");
            for entry in &summary.by_category {
                println!("  {:<28} {}", entry.category, entry.count);
            }
        }
        if !summary.recent.is_empty() {
            println!("Recent:");
            for request in &summary.recent {
                println!(
                    "  {:<10} {:<12} {}",
                    request.request_no,
                    request.status.as_str(),
                    request.employee_name
                );
            }
        }
        Ok(())
    }
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the stored settings and the active store location
    Show(SettingsShowArgs),
    /// Change settings; omitted options keep their stored value
    Set(SettingsSetArgs),
}

impl SettingsCommands {
    /// Execute the settings command
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        match self {
            SettingsCommands::Show(args) => args.run(store),
            SettingsCommands::Set(args) => args.run(store),
        }
    }
}

/// Arguments for showing settings
#[derive(Args)]
pub struct SettingsShowArgs {
    /// Print the settings as JSON
    #[arg(long)]
    pub json: bool,
}

impl SettingsShowArgs {
    /// Execute the settings lookup
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let desk = open_desk(store)?;
        let settings = desk.settings()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }

        println!("Company:       {}", settings.company_name);
        if settings.company_db_path.trim().is_empty() {
            println!("Request store: (bootstrap store)");
        } else {
            println!("Request store: {}", settings.company_db_path);
        }
        println!("Uploads:       {}", settings.upload_folder);
        println!("Active store:  {}", desk.active_store_location().display());
        Ok(())
    }
}

/// Arguments for changing settings
#[derive(Args)]
pub struct SettingsSetArgs {
    /// Company display name
    #[arg(long = "company-name", value_name = "NAME")]
    pub company_name: Option<String>,

    /// Path of the active request store; empty returns to the bootstrap store
    #[arg(long = "company-db-path", value_name = "FILE")]
    pub company_db_path: Option<String>,

    /// Directory receiving uploaded attachments
    #[arg(long = "upload-folder", value_name = "DIR")]
    pub upload_folder: Option<String>,
}

impl SettingsSetArgs {
    /// Execute the settings change
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let mut desk = open_desk(store)?;
        let current = desk.settings()?;

        let input = SettingsInput {
            company_name: self.company_name.unwrap_or(current.company_name),
            company_db_path: self.company_db_path.unwrap_or(current.company_db_path),
            upload_folder: self.upload_folder.unwrap_or(current.upload_folder),
        };
        if let Err(err) = validation::validate_settings(&input) {
            return Err(reject_input(err));
        }

        desk.update_settings(&SettingsRecord {
            company_name: input.company_name,
            company_db_path: input.company_db_path,
            upload_folder: input.upload_folder,
        })?;

        println!("Settings saved");
        println!("Active store: {}", desk.active_store_location().display());
        Ok(())
    }
}
