//! Access-token sources.
//!
//! Session management belongs to the identity provider; the clients only
//! need something that hands them the current bearer token.

use anyhow::{Context, Result};

/// Supplies the bearer token used to authorize backend calls. The clients
/// never refresh or validate it; an expired token simply makes whichever
/// call uses it fail with an authorization-class status.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(&self) -> Result<String>;
}

/// Fixed token, e.g. from configuration or a test.
#[derive(Clone, Debug)]
pub struct StaticToken(pub String);

impl AccessTokenSource for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Reads `SUPABASE_ACCESS_TOKEN` at call time.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvToken;

impl AccessTokenSource for EnvToken {
    fn access_token(&self) -> Result<String> {
        std::env::var("SUPABASE_ACCESS_TOKEN")
            .context("Missing token. Set SUPABASE_ACCESS_TOKEN")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_returns_value() {
        let source = StaticToken("tok".to_string());
        assert_eq!(source.access_token().unwrap(), "tok");
    }
}
