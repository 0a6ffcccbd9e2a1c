//! OAuth2 token-info identity provider.
//!
//! Access tokens are checked by asking the issuer's token-info endpoint
//! about them, as Google's `oauth2/v3/tokeninfo` does.

use async_trait::async_trait;
use benison_exchange::{IdentityProvider, ProviderError, VerifiedIdentity};
use serde::Deserialize;

/// Identity provider backed by a token-info endpoint.
#[derive(Clone)]
pub struct TokenInfoProvider {
    url: String,
    client: reqwest::Client,
}

impl TokenInfoProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The subset of the token-info response we rely on.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    email: Option<String>,
    email_verified: Option<Flag>,
    /// Authorized party: the client the token was issued to.
    azp: Option<String>,
    aud: Option<String>,
    /// Legacy v1 name for `azp`.
    issued_to: Option<String>,
}

/// `email_verified` is a string in v3 responses and a boolean in v1.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

impl TokenInfo {
    fn into_identity(self) -> Result<VerifiedIdentity, ProviderError> {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("no email in token info".to_string()))?;
        if !self.email_verified.is_some_and(|f| f.is_set()) {
            return Err(ProviderError::UnverifiedEmail(email));
        }

        let client_id = [self.azp, self.issued_to, self.aud]
            .into_iter()
            .flatten()
            .find(|c| !c.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no client id in token info".to_string())
            })?;

        Ok(VerifiedIdentity { email, client_id })
    }
}

#[async_trait]
impl IdentityProvider for TokenInfoProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError> {
        if token.is_empty() {
            return Err(ProviderError::Rejected("empty access token".to_string()));
        }

        let response = self
            .client
            .get(&self.url)
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ProviderError::Unavailable(format!(
                "token info request failed: {status}"
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::Rejected(format!(
                "token info request failed: {status}"
            )));
        }

        let info = response
            .json::<TokenInfo>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        info.into_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn provider(server: &mockito::Server) -> TokenInfoProvider {
        TokenInfoProvider::new(format!("{}/tokeninfo", server.url()))
    }

    #[tokio::test]
    async fn test_verified_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::UrlEncoded("access_token".into(), "tok".into()))
            .with_header("content-type", "application/json")
            .with_body(r#"{"azp":"app1","aud":"aud1","email":"a@x.com","email_verified":"true"}"#)
            .create_async()
            .await;

        let identity = provider(&server).verify("tok").await.unwrap();
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.client_id, "app1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_falls_back_to_audience() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::Any)
            .with_body(r#"{"aud":"aud1","email":"a@x.com","email_verified":true}"#)
            .create_async()
            .await;

        let identity = provider(&server).verify("tok").await.unwrap();
        assert_eq!(identity.client_id, "aud1");
    }

    #[tokio::test]
    async fn test_unverified_email() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::Any)
            .with_body(r#"{"azp":"app1","email":"a@x.com","email_verified":"false"}"#)
            .create_async()
            .await;

        assert!(matches!(
            provider(&server).verify("tok").await,
            Err(ProviderError::UnverifiedEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error_description":"Invalid Value"}"#)
            .create_async()
            .await;

        assert!(matches!(
            provider(&server).verify("expired").await,
            Err(ProviderError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_outage() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        assert!(matches!(
            provider(&server).verify("tok").await,
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokeninfo")
            .match_query(Matcher::Any)
            .with_body(r#"{"email":"a@x.com","email_verified":"true"}"#)
            .create_async()
            .await;

        assert!(matches!(
            provider(&server).verify("tok").await,
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_token_is_not_sent() {
        let server = mockito::Server::new_async().await;
        assert!(matches!(
            provider(&server).verify("").await,
            Err(ProviderError::Rejected(_))
        ));
    }
}
