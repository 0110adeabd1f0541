//! The four-step upload-and-caption workflow.
//!
//! Strictly sequential: each step consumes the previous step's output
//! (presigned URL, then uploaded object URL, then image id, then captions),
//! so nothing runs in parallel and the first error halts the run. There is
//! no retry and no compensation; a failed run leaves any already-uploaded
//! or registered object behind, and retrying means starting a fresh
//! session from step 1.

use dormcap_core::models::{CompletedUpload, SelectedFile, UploadPhase, UploadSession, UploadStep};
use dormcap_core::WorkflowError;

use crate::pipeline::PipelineClient;

/// Drives an `UploadSession` through the pipeline.
#[derive(Debug)]
pub struct UploadWorkflow<'a> {
    pipeline: &'a PipelineClient,
}

impl<'a> UploadWorkflow<'a> {
    pub fn new(pipeline: &'a PipelineClient) -> Self {
        Self { pipeline }
    }

    /// Run all four steps, advancing the session phase as each one starts.
    /// On failure the session ends in `Failed` with the step's message and
    /// the error is returned; the session must be reset (new file) before
    /// another attempt. A session already in a terminal phase refuses to
    /// run again without issuing any network call.
    pub async fn run(&self, session: &mut UploadSession) -> Result<(), WorkflowError> {
        if session.phase().is_terminal() {
            return Err(WorkflowError::for_step(
                UploadStep::Presign,
                "Session already finished. Select a new file to retry.",
            ));
        }

        let file = session
            .file()
            .cloned()
            .ok_or_else(|| {
                WorkflowError::for_step(UploadStep::Presign, "Please select a file first.")
            })?;

        match self.run_steps(session, &file).await {
            Ok(()) => Ok(()),
            Err(err) => {
                session.transition(UploadPhase::Failed {
                    step: err.step(),
                    message: err.message().to_string(),
                });
                Err(err)
            }
        }
    }

    async fn run_steps(
        &self,
        session: &mut UploadSession,
        file: &SelectedFile,
    ) -> Result<(), WorkflowError> {
        let content_type = file.content_type_or_default().to_string();

        self.advance(session, UploadPhase::PresigningUrl);
        let presigned = self.pipeline.generate_presigned_url(&content_type).await?;

        self.advance(
            session,
            UploadPhase::UploadingBytes {
                presigned_url: presigned.presigned_url.clone(),
                cdn_url: presigned.cdn_url.clone(),
            },
        );
        self.pipeline
            .upload_bytes(&presigned.presigned_url, file.bytes.clone(), &content_type)
            .await?;

        self.advance(
            session,
            UploadPhase::RegisteringImage {
                cdn_url: presigned.cdn_url.clone(),
            },
        );
        let image_id = self.pipeline.register_image(&presigned.cdn_url).await?;

        self.advance(
            session,
            UploadPhase::GeneratingCaptions {
                cdn_url: presigned.cdn_url.clone(),
                image_id: image_id.clone(),
            },
        );
        let captions = self.pipeline.generate_captions(&image_id).await?;

        self.advance(
            session,
            UploadPhase::Complete {
                cdn_url: presigned.cdn_url,
                image_id,
                captions,
            },
        );
        Ok(())
    }

    fn advance(&self, session: &mut UploadSession, next: UploadPhase) {
        if let Some(status) = next.status_message() {
            tracing::info!("{}", status);
        }
        session.transition(next);
    }
}

/// One-shot entry point: run the workflow for `file` against `pipeline`
/// with a fresh session, returning the completed upload.
pub async fn run_upload_and_caption(
    pipeline: &PipelineClient,
    file: SelectedFile,
) -> Result<CompletedUpload, WorkflowError> {
    let mut session = UploadSession::new();
    session.select_file(file);
    UploadWorkflow::new(pipeline).run(&mut session).await?;

    match session.phase() {
        UploadPhase::Complete {
            cdn_url,
            image_id,
            captions,
        } => Ok(CompletedUpload {
            cdn_url: cdn_url.clone(),
            image_id: image_id.clone(),
            captions: captions.clone(),
        }),
        // Unreachable: run() only returns Ok after transitioning to Complete.
        other => Err(WorkflowError::for_step(
            UploadStep::Generate,
            format!("Workflow ended in unexpected phase: {:?}", other),
        )),
    }
}
