//! Assistant command: ask the desk a question.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hrsd_api_contract::{validation, ChatInput};
use hrsd_chat::{ChatClient, RequestContext};

use crate::{open_desk, reject_input};

/// Arguments for asking the assistant
#[derive(Args)]
pub struct ChatArgs {
    /// The question to ask
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Request number to ground the answer in
    #[arg(long = "request", value_name = "NO")]
    pub request_no: Option<String>,

    /// Print the full reply payload as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatArgs {
    /// Execute the question
    pub fn run(self, store: Option<PathBuf>) -> Result<()> {
        let input = ChatInput {
            message: self.message.clone(),
            request_no: self.request_no.clone(),
        };
        if let Err(err) = validation::validate_chat_input(&input) {
            return Err(reject_input(err));
        }

        // A missing request is not fatal; the assistant just answers
        // without the grounding block.
        let context = match &input.request_no {
            Some(request_no) => {
                let desk = open_desk(store)?;
                match desk.get_request(request_no)? {
                    Some(detail) => Some(RequestContext {
                        request_no: detail.request.request_no.clone(),
                        employee_name: detail.request.employee_name.clone(),
                        category: detail.request.category.clone(),
                        request_type: detail.request.request_type.clone(),
                        status: detail.request.status.to_string(),
                        assignee: detail.request.assignee.clone(),
                        created_at: detail.request.created_at.to_rfc3339(),
                    }),
                    None => {
                        tracing::debug!(request_no, "No such request for chat grounding");
                        None
                    }
                }
            }
            None => None,
        };

        let outcome = ChatClient::from_env()
            .and_then(|client| client.ask(&input.message, context.as_ref()));

        match outcome {
            Ok(reply) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&reply)?);
                } else {
                    println!("{}", reply.reply);
                    tracing::debug!(model = %reply.model, "Assistant replied");
                }
                Ok(())
            }
            Err(err) => {
                // The payload goes to stdout either way; the exit code
                // carries the failure.
                println!("{}", serde_json::to_string(&err.to_payload())?);
                anyhow::bail!("Assistant request failed")
            }
        }
    }
}
