//! Assistant client for the HR Service Desk
//!
//! Talks to an OpenAI-compatible chat completion endpoint (Groq by
//! default) and keeps every failure inside a structured payload so the
//! desk surface never crashes on assistant trouble.

pub mod client;
pub mod error;

pub use client::{ChatClient, RequestContext, DEFAULT_BASE_URL, DEFAULT_MODEL, MAX_MESSAGE_LEN};
pub use error::{ChatError, Result};
