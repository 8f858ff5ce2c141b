//! docchat core
//!
//! Message rendering for the document chat view, the backend client that
//! feeds it, and the collaborators the chat client drives: upload progress
//! polling and figure selection.

pub mod api;
pub mod config;
pub mod figure;
pub mod render;
pub mod upload;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use render::{render, AnswerKind};
