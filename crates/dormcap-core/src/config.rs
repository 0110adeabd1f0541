//! Configuration module
//!
//! Environment-driven configuration for the two external backends: the
//! captioning pipeline API and the Supabase project (PostgREST + GoTrue).

use std::env;

use crate::error::AppError;

/// Production endpoint of the captioning pipeline.
pub const DEFAULT_PIPELINE_API_URL: &str = "https://api.almostcrackd.ai";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the captioning pipeline API.
    pub pipeline_api_url: String,
    /// Base URL of the Supabase project.
    pub supabase_url: String,
    /// Supabase project anon key, sent as the `apikey` header.
    pub supabase_anon_key: String,
    /// Access token of the logged-in user. Acquisition and refresh are the
    /// identity provider's business; commands that need auth fail without it.
    pub access_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `PIPELINE_API_URL` is optional and defaults to the production
    /// endpoint; `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required;
    /// `SUPABASE_ACCESS_TOKEN` is picked up when present.
    pub fn from_env() -> Result<Self, AppError> {
        let pipeline_api_url = env::var("PIPELINE_API_URL")
            .unwrap_or_else(|_| DEFAULT_PIPELINE_API_URL.to_string());
        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| AppError::Config("SUPABASE_URL is required".to_string()))?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| AppError::Config("SUPABASE_ANON_KEY is required".to_string()))?;
        let access_token = env::var("SUPABASE_ACCESS_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(Self {
            pipeline_api_url: trim_base_url(&pipeline_api_url),
            supabase_url: trim_base_url(&supabase_url),
            supabase_anon_key,
            access_token,
        })
    }

    pub fn require_access_token(&self) -> Result<&str, AppError> {
        self.access_token.as_deref().ok_or_else(|| {
            AppError::Unauthorized("Not logged in. Set SUPABASE_ACCESS_TOKEN".to_string())
        })
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        assert_eq!(trim_base_url("https://x.example/"), "https://x.example");
        assert_eq!(trim_base_url("https://x.example"), "https://x.example");
    }

    #[test]
    fn require_access_token_missing() {
        let config = Config {
            pipeline_api_url: DEFAULT_PIPELINE_API_URL.to_string(),
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            access_token: None,
        };
        assert!(config.require_access_token().is_err());
    }

    #[test]
    fn require_access_token_present() {
        let config = Config {
            pipeline_api_url: DEFAULT_PIPELINE_API_URL.to_string(),
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            access_token: Some("tok".to_string()),
        };
        assert_eq!(config.require_access_token().unwrap(), "tok");
    }
}
