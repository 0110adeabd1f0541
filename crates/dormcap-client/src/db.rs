//! Client for the Supabase backend (PostgREST rows + GoTrue user).
//!
//! Plain CRUD pass-throughs: list dorms, fetch a caption to rate, record a
//! vote, look up the logged-in user. Every request carries the project
//! `apikey` header plus the user's bearer token; row-level policies on the
//! backend do the rest.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use dormcap_core::models::{AuthUser, Caption, CaptionVote, Dorm};

use crate::token::AccessTokenSource;

/// HTTP client for the Supabase project.
#[derive(Clone)]
pub struct DbClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Arc<dyn AccessTokenSource>,
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DbClient {
    pub fn new(
        base_url: String,
        anon_key: String,
        token: Arc<dyn AccessTokenSource>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            token,
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let token = self.token.access_token()?;
        Ok(request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token)))
    }

    /// GET request with query parameters. Deserializes the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request)?;

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Backend request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// List every dorm, all columns.
    pub async fn list_dorms(&self) -> Result<Vec<Dorm>> {
        self.get("/rest/v1/dorms", &[("select", "*".to_string())])
            .await
    }

    /// Fetch one caption to rate, or `None` when the table is empty.
    pub async fn next_caption(&self) -> Result<Option<Caption>> {
        let rows: Vec<Caption> = self
            .get(
                "/rest/v1/captions",
                &[
                    ("select", "id,content,created_datetime_utc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch a caption by id.
    pub async fn get_caption(&self, id: Uuid) -> Result<Option<Caption>> {
        let rows: Vec<Caption> = self
            .get(
                "/rest/v1/captions",
                &[
                    ("select", "id,content,created_datetime_utc".to_string()),
                    ("id", format!("eq.{}", id)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// The logged-in user behind the current access token.
    pub async fn current_user(&self) -> Result<AuthUser> {
        self.get("/auth/v1/user", &[]).await
    }

    /// Insert one vote row.
    pub async fn record_vote(&self, vote: &CaptionVote) -> Result<()> {
        let url = format!("{}/rest/v1/caption_votes", self.base_url);
        let request = self
            .client
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(vote);
        let request = self.apply_auth(request)?;

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Backend request failed with status {}: {}",
                status,
                error_text
            ));
        }

        tracing::debug!(caption_id = %vote.caption_id, vote_value = vote.vote_value, "Recorded vote");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticToken;
    use dormcap_core::models::VoteKind;
    use mockito::{Matcher, Server};

    fn client(base_url: String) -> DbClient {
        DbClient::new(
            base_url,
            "anon-key".to_string(),
            Arc::new(StaticToken("tok".to_string())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_dorms_sends_project_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/dorms")
            .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                r#"[{
                    "id": "0a88c4f6-5bfb-4f33-aa62-2f3a2cf276b1",
                    "university_id": "4a4ac7ae-0e5b-4a59-99e0-2a7fe3a1b3c9",
                    "short_name": "EC",
                    "full_name": "East Campus",
                    "created_at": "2024-09-01T12:00:00+00:00",
                    "updated_at": "2024-09-01T12:00:00+00:00"
                }]"#,
            )
            .create_async()
            .await;

        let dorms = client(server.url()).list_dorms().await.unwrap();
        assert_eq!(dorms.len(), 1);
        assert_eq!(dorms[0].short_name, "EC");
        assert_eq!(dorms[0].full_name, "East Campus");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn next_caption_returns_none_when_table_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/captions")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "id,content,created_datetime_utc".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let caption = client(server.url()).next_caption().await.unwrap();
        assert!(caption.is_none());
    }

    #[tokio::test]
    async fn next_caption_parses_row() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/v1/captions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{
                    "id": "9c1f1ae8-7a07-4c0e-8f0e-24e355f3ef2b",
                    "content": "A dog.",
                    "created_datetime_utc": "2024-10-05T08:30:00+00:00"
                }]"#,
            )
            .create_async()
            .await;

        let caption = client(server.url()).next_caption().await.unwrap().unwrap();
        assert_eq!(caption.content, "A dog.");
    }

    #[tokio::test]
    async fn record_vote_posts_exact_row() {
        let mut server = Server::new_async().await;
        let caption = Caption {
            id: Uuid::new_v4(),
            content: "A dog.".to_string(),
            created_datetime_utc: "2024-10-05T08:30:00Z".parse().unwrap(),
        };
        let profile_id = Uuid::new_v4();
        let vote = CaptionVote::new(profile_id, &caption, VoteKind::Down);

        let mock = server
            .mock("POST", "/rest/v1/caption_votes")
            .match_header("prefer", "return=minimal")
            .match_header("apikey", "anon-key")
            .match_body(Matcher::Json(serde_json::to_value(&vote).unwrap()))
            .with_status(201)
            .create_async()
            .await;

        client(server.url()).record_vote(&vote).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn record_vote_surfaces_backend_error() {
        let mut server = Server::new_async().await;
        let caption = Caption {
            id: Uuid::new_v4(),
            content: "A dog.".to_string(),
            created_datetime_utc: "2024-10-05T08:30:00Z".parse().unwrap(),
        };
        let vote = CaptionVote::new(Uuid::new_v4(), &caption, VoteKind::Up);

        server
            .mock("POST", "/rest/v1/caption_votes")
            .with_status(409)
            .with_body(r#"{"message":"duplicate key value"}"#)
            .create_async()
            .await;

        let err = client(server.url()).record_vote(&vote).await.unwrap_err();
        assert!(err.to_string().contains("409"));
    }

    #[tokio::test]
    async fn current_user_parses_id() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                r#"{
                    "id": "b3b1f6e0-94cb-4d37-9a0f-b19f4ce0cfa7",
                    "email": "student@columbia.edu"
                }"#,
            )
            .create_async()
            .await;

        let user = client(server.url()).current_user().await.unwrap();
        assert_eq!(user.email.as_deref(), Some("student@columbia.edu"));
    }
}
