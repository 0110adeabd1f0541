//! HTTP clients for the dormcap backends.
//!
//! Two external collaborators, two clients: `PipelineClient` talks to the
//! captioning pipeline API (presign, upload, register, generate), `DbClient`
//! talks to the Supabase project (PostgREST rows and the auth user). The
//! access token comes from an injected `AccessTokenSource` so the clients
//! can be tested with a fixed token and a mock server.

pub mod db;
pub mod pipeline;
pub mod token;
pub mod workflow;

pub use db::DbClient;
pub use pipeline::{PipelineClient, PresignedUrlResponse};
pub use token::{AccessTokenSource, EnvToken, StaticToken};
pub use workflow::{run_upload_and_caption, UploadWorkflow};
