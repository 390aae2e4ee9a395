//! Core types for chatvec
//!
//! Conversation loading, message extraction, distance metrics and in-memory ranking
//! shared by the storage, service and transport crates.

mod config;
pub mod constants;
mod conversation;
pub mod env_config;
mod error;
mod extract;
mod message;
mod metric;
mod search;
mod write;

pub use config::*;
pub use conversation::*;
pub use error::*;
pub use extract::*;
pub use message::*;
pub use metric::*;
pub use search::*;
pub use write::*;
