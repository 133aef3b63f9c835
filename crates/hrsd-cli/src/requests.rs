//! Request lifecycle commands: submit, list, show, update, attach.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hrsd_api_contract::{
    validation, SubmitRequestInput, SubmitRequestResponse, UpdateStatusInput,
};
use hrsd_core::{NewRequest, RequestDetail, RequestStatus};

use crate::{open_desk, reject_input};

/// Arguments for submitting a new request
#[derive(Args)]
pub struct SubmitArgs {
    /// Employee identifier
    #[arg(long = "employee-id", value_name = "ID")]
    pub employee_id: String,

    /// Employee display name
    #[arg(long = "employee-name", value_name = "NAME")]
    pub employee_name: String,

    /// Preferred request number; left out, the desk assigns one
    #[arg(long = "request-no", value_name = "NO", default_value = "")]
    pub request_no: String,

    /// Cluster or region of the employee
    #[arg(long, value_name = "CLUSTER", default_value = "")]
    pub cluster: String,

    /// Department of the employee
    #[arg(long, value_name = "DEPT", default_value = "")]
    pub department: String,

    /// Request category, drives team routing
    #[arg(long, value_name = "CATEGORY")]
    pub category: String,

    /// Request type within the category
    #[arg(long = "type", value_name = "TYPE", default_value = "")]
    pub request_type: String,

    /// Free-form description
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub details: String,

    /// Working days until due (defaults to the category's SLA)
    #[arg(long = "duration-days", value_name = "DAYS")]
    pub duration_days: Option<i64>,

    /// File to attach (repeatable)
    #[arg(long = "attach", value_name = "FILE")]
    pub attach: Vec<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl SubmitArgs {
    /// Execute the submission
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let input = SubmitRequestInput {
            request_no: self.request_no.clone(),
            employee_id: self.employee_id.clone(),
            employee_name: self.employee_name.clone(),
            cluster: self.cluster.clone(),
            department: self.department.clone(),
            category: self.category.clone(),
            request_type: self.request_type.clone(),
            details: self.details.clone(),
            duration_days: self.duration_days,
        };
        if let Err(err) = validation::validate_submit_request(&input) {
            return Err(reject_input(err));
        }

        let desk = open_desk(store)?;
        let created = desk.create_request(&NewRequest {
            suggested_no: input.request_no,
            employee_id: input.employee_id,
            employee_name: input.employee_name,
            cluster: input.cluster,
            department: input.department,
            category: input.category,
            request_type: input.request_type,
            details: input.details,
            duration_days: input.duration_days,
        })?;

        for path in &self.attach {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read attachment {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stored = desk.save_upload(&created.request_no, &filename, &bytes)?;
            desk.attach_file(created.id, &filename, &stored.to_string_lossy())?;
        }

        let detail = desk
            .get_request(&created.request_no)?
            .context("Created request disappeared from the store")?;

        if self.json {
            let response = SubmitRequestResponse {
                request_no: detail.request.request_no.clone(),
                status: detail.request.status.to_string(),
                assignee: detail.request.assignee.clone(),
                duration_days: detail.request.duration_days,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("Created request {}", detail.request.request_no);
            if detail.request.assignee.is_empty() {
                println!("No team routed for this category yet");
            } else {
                println!("Assigned to {}", detail.request.assignee);
            }
            println!(
                "Due {} ({} working days)",
                detail.request.due_date(),
                detail.request.duration_days
            );
            if !detail.attachments.is_empty() {
                println!("Attached {} file(s)", detail.attachments.len());
            }
        }

        Ok(())
    }
}

/// Arguments for listing requests
#[derive(Args)]
pub struct ListArgs {
    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the listing
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let desk = open_desk(store)?;
        let requests = desk.list_requests()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&requests)?);
            return Ok(());
        }

        if requests.is_empty() {
            println!("No requests yet");
            return Ok(());
        }
        for request in &requests {
            println!(
                "{:<10} {:<12} {:<24} {}",
                request.request_no,
                request.status.as_str(),
                request.employee_name,
                request.category
            );
        }
        Ok(())
    }
}

/// Arguments for showing one request
#[derive(Args)]
pub struct ShowArgs {
    /// Request number to show
    #[arg(value_name = "REQUEST_NO")]
    pub request_no: String,

    /// Print the request as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Execute the lookup
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let desk = open_desk(store)?;
        let detail = match desk.get_request(&self.request_no)? {
            Some(detail) => detail,
            None => anyhow::bail!("Request {} not found", self.request_no),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            return Ok(());
        }

        print_detail(&detail);
        Ok(())
    }
}

fn print_detail(detail: &RequestDetail) {
    let request = &detail.request;
    println!("Request {}", request.request_no);
    println!("  Employee:  {} ({})", request.employee_name, request.employee_id);
    if !request.cluster.is_empty() || !request.department.is_empty() {
        println!("  Unit:      {} / {}", request.cluster, request.department);
    }
    println!("  Category:  {}", request.category);
    if !request.request_type.is_empty() {
        println!("  Type:      {}", request.request_type);
    }
    println!("  Status:    {}", request.status);
    println!("  Assignee:  {}", request.assignee);
    println!("  Created:   {}", request.created_at.to_rfc3339());
    println!("  Due:       {}", request.due_date());
    if !request.details.is_empty() {
        println!("  Details:   {}", request.details);
    }
    if !detail.attachments.is_empty() {
        println!("  Attachments:");
        for attachment in &detail.attachments {
            println!("    {} -> {}", attachment.filename, attachment.stored_path);
        }
    }
}

/// Arguments for updating a request's status
#[derive(Args)]
pub struct UpdateArgs {
    /// Request number to update
    #[arg(value_name = "REQUEST_NO")]
    pub request_no: String,

    /// New status (Submitted, In Progress, Completed, Rejected)
    #[arg(long, value_name = "STATUS")]
    pub status: String,

    /// Team or person now holding the request
    #[arg(long, value_name = "NAME", default_value = "")]
    pub assignee: String,
}

impl UpdateArgs {
    /// Execute the status update
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let input = UpdateStatusInput {
            request_no: self.request_no.clone(),
            status: self.status.clone(),
            assignee: self.assignee.clone(),
        };
        if let Err(err) = validation::validate_update_status(&input) {
            return Err(reject_input(err));
        }

        let status = RequestStatus::parse(&input.status)?;
        let desk = open_desk(store)?;
        desk.update_status(&input.request_no, status, &input.assignee)?;

        println!("Request {} set to {}", input.request_no, status);
        Ok(())
    }
}

/// Arguments for attaching a file to an existing request
#[derive(Args)]
pub struct AttachArgs {
    /// Request number to attach to
    #[arg(value_name = "REQUEST_NO")]
    pub request_no: String,

    /// File to attach
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl AttachArgs {
    /// Execute the attachment
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let desk = open_desk(store)?;
        let detail = match desk.get_request(&self.request_no)? {
            Some(detail) => detail,
            None => anyhow::bail!("Request {} not found", self.request_no),
        };

        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read attachment {}", self.file.display()))?;
        let filename = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stored = desk.save_upload(&detail.request.request_no, &filename, &bytes)?;
        desk.attach_file(detail.request.id, &filename, &stored.to_string_lossy())?;

        println!("Stored {}", stored.display());
        Ok(())
    }
}
