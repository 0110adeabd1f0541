//! Upload workflow state.
//!
//! One user-initiated upload runs through four strictly ordered steps:
//! presign, upload bytes, register, generate captions. The phase is a sum
//! type so each variant carries only the data that is valid at that point —
//! a presigned URL exists only while bytes are being uploaded, captions
//! exist only once the run is complete.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Content type assumed when the selected file does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// File picked by the user, pending upload.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Bytes,
    /// Declared MIME type; `None` when the source did not provide one.
    pub content_type: Option<String>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Bytes, content_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            bytes,
            content_type,
        }
    }

    /// Declared content type, or `image/jpeg` when absent.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Detect an image content type from magic numbers. `None` when the data is
/// not a recognized image format.
pub fn detect_content_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return Some("image/png");
    }

    // GIF: 47 49 46
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return Some("image/gif");
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12
        && data[0] == 0x52
        && data[1] == 0x49
        && data[2] == 0x46
        && data[3] == 0x46
        && data[8] == 0x57
        && data[9] == 0x45
        && data[10] == 0x42
        && data[11] == 0x50
    {
        return Some("image/webp");
    }

    None
}

/// One caption produced by the captioning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCaption {
    pub id: String,
    pub content: String,
}

/// Steps of the workflow, numbered 1-4 as the pipeline error strings count
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStep {
    Presign,
    Upload,
    Register,
    Generate,
}

impl UploadStep {
    pub fn number(self) -> u8 {
        match self {
            UploadStep::Presign => 1,
            UploadStep::Upload => 2,
            UploadStep::Register => 3,
            UploadStep::Generate => 4,
        }
    }
}

/// Phase of an upload session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    PresigningUrl,
    UploadingBytes {
        presigned_url: String,
        cdn_url: String,
    },
    RegisteringImage {
        cdn_url: String,
    },
    GeneratingCaptions {
        cdn_url: String,
        image_id: String,
    },
    Complete {
        cdn_url: String,
        image_id: String,
        captions: Vec<GeneratedCaption>,
    },
    Failed {
        step: UploadStep,
        message: String,
    },
}

impl UploadPhase {
    /// Progress text shown while the workflow runs; `None` when idle or
    /// failed (a failure replaces the status with its own message).
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            UploadPhase::Idle | UploadPhase::Failed { .. } => None,
            UploadPhase::PresigningUrl => Some("Generating presigned URL..."),
            UploadPhase::UploadingBytes { .. } => Some("Uploading image bytes..."),
            UploadPhase::RegisteringImage { .. } => Some("Registering image in pipeline..."),
            UploadPhase::GeneratingCaptions { .. } => Some("Generating captions..."),
            UploadPhase::Complete { .. } => Some("Captions generated successfully!"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Complete { .. } | UploadPhase::Failed { .. })
    }

    /// Stable read URL of the uploaded object, once the presign step has
    /// assigned it.
    pub fn cdn_url(&self) -> Option<&str> {
        match self {
            UploadPhase::UploadingBytes { cdn_url, .. }
            | UploadPhase::RegisteringImage { cdn_url }
            | UploadPhase::GeneratingCaptions { cdn_url, .. }
            | UploadPhase::Complete { cdn_url, .. } => Some(cdn_url),
            _ => None,
        }
    }

    /// Generated captions; empty unless the run completed.
    pub fn captions(&self) -> &[GeneratedCaption] {
        match self {
            UploadPhase::Complete { captions, .. } => captions,
            _ => &[],
        }
    }

    /// Position in the forward-only phase order. Failed sorts last so no
    /// further transition can leave it.
    fn rank(&self) -> u8 {
        match self {
            UploadPhase::Idle => 0,
            UploadPhase::PresigningUrl => 1,
            UploadPhase::UploadingBytes { .. } => 2,
            UploadPhase::RegisteringImage { .. } => 3,
            UploadPhase::GeneratingCaptions { .. } => 4,
            UploadPhase::Complete { .. } => 5,
            UploadPhase::Failed { .. } => 6,
        }
    }
}

/// Ephemeral state for one user-initiated upload.
///
/// Created when the user selects a file, discarded when a new file is
/// selected; never persisted. Phase transitions are strictly forward: a
/// terminal phase (complete or failed) is only left by selecting a new
/// file, which resets every derived field.
#[derive(Debug, Default)]
pub struct UploadSession {
    file: Option<SelectedFile>,
    phase: UploadPhase,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a file, clearing any prior run's derived state.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.phase = UploadPhase::Idle;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Advance to `next`. Backward or out-of-terminal moves are ignored;
    /// any non-terminal phase may move to `Failed`.
    pub fn transition(&mut self, next: UploadPhase) {
        let allowed = match (&self.phase, &next) {
            (UploadPhase::Complete { .. } | UploadPhase::Failed { .. }, _) => false,
            (_, UploadPhase::Failed { .. }) => true,
            (current, next) => next.rank() > current.rank(),
        };
        if allowed {
            self.phase = next;
        }
    }
}

/// Result of a completed upload-and-caption run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedUpload {
    pub cdn_url: String,
    pub image_id: String,
    pub captions: Vec<GeneratedCaption>,
}
