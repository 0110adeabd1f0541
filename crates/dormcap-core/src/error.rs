//! Error types module
//!
//! `WorkflowError` covers the four-step upload-and-caption workflow; each
//! variant identifies the step that failed and carries the message exactly
//! as it is shown to the user. `AppError` covers everything else.

use crate::models::UploadStep;

/// Application-level errors outside the upload workflow.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Error raised by one step of the upload-and-caption workflow.
///
/// The sequence halts at the first error; nothing is retried and no remote
/// state is rolled back. `Display` yields the user-facing message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{message}")]
    Presign { message: String },

    #[error("{message}")]
    Upload { message: String },

    #[error("{message}")]
    Register { message: String },

    #[error("{message}")]
    Generate { message: String },
}

impl WorkflowError {
    pub fn for_step(step: UploadStep, message: impl Into<String>) -> Self {
        let message = message.into();
        match step {
            UploadStep::Presign => Self::Presign { message },
            UploadStep::Upload => Self::Upload { message },
            UploadStep::Register => Self::Register { message },
            UploadStep::Generate => Self::Generate { message },
        }
    }

    /// Fallback for a control-plane step whose failure body had no usable
    /// `message` field.
    pub fn api_error(step: UploadStep, status: u16) -> Self {
        Self::for_step(step, format!("API error (Step {}): {}", step.number(), status))
    }

    /// Failure of the raw byte upload (step 2), which returns no structured
    /// body; only the transport status text is available.
    pub fn upload_failed(status_text: &str) -> Self {
        Self::Upload {
            message: format!("Upload failed (Step 2): {}", status_text),
        }
    }

    /// Catch-all for transport-level failures where no HTTP status exists.
    pub fn transport(step: UploadStep) -> Self {
        Self::for_step(step, "An error occurred during the process.")
    }

    pub fn step(&self) -> UploadStep {
        match self {
            Self::Presign { .. } => UploadStep::Presign,
            Self::Upload { .. } => UploadStep::Upload,
            Self::Register { .. } => UploadStep::Register,
            Self::Generate { .. } => UploadStep::Generate,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Presign { message }
            | Self::Upload { message }
            | Self::Register { message }
            | Self::Generate { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_fallback_message() {
        let err = WorkflowError::api_error(UploadStep::Register, 400);
        assert_eq!(err.to_string(), "API error (Step 3): 400");
        assert_eq!(err.step(), UploadStep::Register);
    }

    #[test]
    fn upload_failed_uses_status_text() {
        let err = WorkflowError::upload_failed("Forbidden");
        assert_eq!(err.to_string(), "Upload failed (Step 2): Forbidden");
        assert_eq!(err.step(), UploadStep::Upload);
    }

    #[test]
    fn transport_fallback_message() {
        let err = WorkflowError::transport(UploadStep::Generate);
        assert_eq!(err.to_string(), "An error occurred during the process.");
        assert_eq!(err.step(), UploadStep::Generate);
    }

    #[test]
    fn display_is_message_verbatim() {
        let err = WorkflowError::for_step(UploadStep::Presign, "quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.message(), "quota exceeded");
    }
}
