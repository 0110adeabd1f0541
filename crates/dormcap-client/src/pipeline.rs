//! Client for the captioning pipeline API.
//!
//! Four endpoints back the upload-and-caption workflow: presign a write
//! URL, upload the bytes to it, register the uploaded object, generate
//! captions. Control-plane calls (1, 3, 4) are authorized with a bearer
//! token and speak JSON; the byte upload (2) writes raw bytes to the
//! presigned URL, which is itself the credential.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use dormcap_core::models::{GeneratedCaption, UploadStep};
use dormcap_core::WorkflowError;

use crate::token::AccessTokenSource;

/// Response of the presign endpoint: a single-use write URL and the stable
/// read URL the object will be served from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlResponse {
    pub presigned_url: String,
    pub cdn_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignRequest<'a> {
    content_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    image_url: &'a str,
    is_common_use: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    image_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    image_id: &'a str,
}

/// HTTP client for the captioning pipeline.
#[derive(Clone)]
pub struct PipelineClient {
    client: Client,
    base_url: String,
    token: Arc<dyn AccessTokenSource>,
}

impl std::fmt::Debug for PipelineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PipelineClient {
    pub fn new(base_url: String, token: Arc<dyn AccessTokenSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self, step: UploadStep) -> Result<String, WorkflowError> {
        self.token
            .access_token()
            .map_err(|e| WorkflowError::for_step(step, e.to_string()))
    }

    /// Step 1: obtain a presigned write URL and the final read URL for an
    /// object of the given content type.
    pub async fn generate_presigned_url(
        &self,
        content_type: &str,
    ) -> Result<PresignedUrlResponse, WorkflowError> {
        let step = UploadStep::Presign;
        let token = self.bearer(step)?;

        let response = self
            .client
            .post(format!("{}/pipeline/generate-presigned-url", self.base_url))
            .bearer_auth(token)
            .json(&PresignRequest { content_type })
            .send()
            .await
            .map_err(|_| WorkflowError::transport(step))?;

        let status = response.status();
        if !status.is_success() {
            return Err(control_plane_error(step, status, response).await);
        }

        response
            .json()
            .await
            .map_err(|_| WorkflowError::transport(step))
    }

    /// Step 2: write the file bytes to the presigned URL. No auth header;
    /// no structured error body is expected from this endpoint.
    pub async fn upload_bytes(
        &self,
        presigned_url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), WorkflowError> {
        let step = UploadStep::Upload;

        let response = self
            .client
            .put(presigned_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|_| WorkflowError::transport(step))?;

        let status = response.status();
        if !status.is_success() {
            // Non-standard codes have no reason phrase; use the number.
            return Err(WorkflowError::upload_failed(
                status.canonical_reason().unwrap_or(status.as_str()),
            ));
        }

        Ok(())
    }

    /// Step 3: register the uploaded object with the pipeline by its read
    /// URL. `isCommonUse` is a fixed policy choice, always false here.
    pub async fn register_image(&self, image_url: &str) -> Result<String, WorkflowError> {
        let step = UploadStep::Register;
        let token = self.bearer(step)?;

        let response = self
            .client
            .post(format!("{}/pipeline/upload-image-from-url", self.base_url))
            .bearer_auth(token)
            .json(&RegisterRequest {
                image_url,
                is_common_use: false,
            })
            .send()
            .await
            .map_err(|_| WorkflowError::transport(step))?;

        let status = response.status();
        if !status.is_success() {
            return Err(control_plane_error(step, status, response).await);
        }

        let registered: RegisterResponse = response
            .json()
            .await
            .map_err(|_| WorkflowError::transport(step))?;

        Ok(registered.image_id)
    }

    /// Step 4: generate captions for a registered image.
    pub async fn generate_captions(
        &self,
        image_id: &str,
    ) -> Result<Vec<GeneratedCaption>, WorkflowError> {
        let step = UploadStep::Generate;
        let token = self.bearer(step)?;

        let response = self
            .client
            .post(format!("{}/pipeline/generate-captions", self.base_url))
            .bearer_auth(token)
            .json(&GenerateRequest { image_id })
            .send()
            .await
            .map_err(|_| WorkflowError::transport(step))?;

        let status = response.status();
        if !status.is_success() {
            return Err(control_plane_error(step, status, response).await);
        }

        response
            .json()
            .await
            .map_err(|_| WorkflowError::transport(step))
    }
}

/// Failure bodies are parsed as JSON best-effort: a non-empty `message`
/// field wins, anything else falls back to the fixed per-step string.
async fn control_plane_error(
    step: UploadStep,
    status: StatusCode,
    response: reqwest::Response,
) -> WorkflowError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty());

    match message {
        Some(message) => WorkflowError::for_step(step, message),
        None => WorkflowError::api_error(step, status.as_u16()),
    }
}
