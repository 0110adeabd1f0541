//! Data models for the application
//!
//! Organized by domain: rows of the managed database (dorms, captions,
//! votes), the identity provider's user, and the upload workflow state.

mod caption;
mod dorm;
mod upload;
mod user;

// Re-export all models for convenient imports
pub use caption::*;
pub use dorm::*;
pub use upload::*;
pub use user::*;
