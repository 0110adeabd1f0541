use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user as returned by the identity provider
/// (`GET /auth/v1/user`). Only the fields the app reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
