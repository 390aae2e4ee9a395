//! Service layer for chatvec
//!
//! Orchestrates loading, extraction, embedding and storage for the CLI and HTTP layers.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod ingest_service;
mod search_service;

pub use error::ServiceError;
pub use ingest_service::{IngestOptions, IngestReport, IngestService};
pub use search_service::SearchService;
