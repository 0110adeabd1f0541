//! Dormcap Core Library
//!
//! This crate provides the domain models, the upload workflow state machine,
//! error types, and configuration shared across the dormcap components.
//! It performs no I/O; HTTP clients live in `dormcap-client`.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, WorkflowError};
pub use models::{
    AuthUser, Caption, CaptionVote, CompletedUpload, Dorm, GeneratedCaption, SelectedFile,
    UploadPhase, UploadSession, UploadStep, VoteKind,
};
