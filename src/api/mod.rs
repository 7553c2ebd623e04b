//! Client for the external generation backend
//!
//! - POST /extract-text - document upload to plain text
//! - POST /summaries - summary and outline generation
//! - POST /scripts - per-speaker script generation

mod client;
mod error;
mod types;

pub use client::{ApiConfig, PrepNoteClient};
pub use error::{ApiError, GENERIC_FAILURE};
pub use types::{
    Audience, CreateScriptRequest, CreateScriptResponse, CreateSummaryRequest,
    CreateSummaryResponse, ExtractTextResponse, ScriptOptions, SummaryLength, SummaryOptions,
    Tone, UserType,
};
