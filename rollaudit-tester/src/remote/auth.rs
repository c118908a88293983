use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::Credentials;

const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
}

/// Exchanges a username/password pair for a bearer token.
#[derive(Debug, Clone)]
pub struct CognitoAuthenticator {
    http: reqwest::Client,
    endpoint: String,
}

impl CognitoAuthenticator {
    pub fn for_region(http: reqwest::Client, region: &str) -> Self {
        Self::with_endpoint(http, format!("https://cognito-idp.{region}.amazonaws.com/"))
    }

    pub fn with_endpoint(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the password auth flow.
    ///
    /// Returns `Ok(None)` when the provider answers but issues no token (an
    /// error status or a pending challenge).
    pub async fn access_token(&self, credentials: &Credentials) -> Result<Option<String>, AuthError> {
        log::info!(
            "authenticating {} against pool {}",
            credentials.username,
            credentials.user_pool_id
        );
        let payload = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": credentials.client_id,
            "AuthParameters": {
                "USERNAME": credentials.username,
                "PASSWORD": credentials.password,
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", INITIATE_AUTH_TARGET)
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("identity provider answered {status}");
            return Ok(None);
        }

        let parsed: InitiateAuthResponse = response.json().await?;
        if parsed.authentication_result.is_none() {
            log::warn!("identity provider returned a challenge instead of tokens");
        }
        Ok(parsed.authentication_result.map(|result| result.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::test_server::{self, json as json_response};
    use hyper::StatusCode;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            user_pool_id: "pool-1".to_string(),
            client_id: "client-1".to_string(),
            username: "auditor".to_string(),
            password: password.to_string(),
        }
    }

    fn provider(parts: &hyper::http::request::Parts, body: &[u8]) -> hyper::Response<hyper::Body> {
        let target = parts
            .headers
            .get("x-amz-target")
            .and_then(|v| v.to_str().ok());
        if target != Some(INITIATE_AUTH_TARGET) {
            return json_response(StatusCode::BAD_REQUEST, json!({"message": "bad target"}));
        }
        let request: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
        match request["AuthParameters"]["PASSWORD"].as_str() {
            Some("correct") if request["ClientId"] == "client-1" => json_response(
                StatusCode::OK,
                json!({"AuthenticationResult": {"AccessToken": "token-123", "ExpiresIn": 3600}}),
            ),
            Some("challenge") => json_response(
                StatusCode::OK,
                json!({"ChallengeName": "NEW_PASSWORD_REQUIRED", "Session": "abc"}),
            ),
            _ => json_response(
                StatusCode::BAD_REQUEST,
                json!({"__type": "NotAuthorizedException"}),
            ),
        }
    }

    #[test]
    fn region_endpoint_uses_regional_host() {
        let auth = CognitoAuthenticator::for_region(reqwest::Client::new(), "eu-west-1");
        assert_eq!(auth.endpoint(), "https://cognito-idp.eu-west-1.amazonaws.com/");
    }

    #[tokio::test]
    async fn returns_access_token_on_success() {
        let url = test_server::spawn(provider).await;
        let auth = CognitoAuthenticator::with_endpoint(reqwest::Client::new(), url);
        let token = auth.access_token(&credentials("correct")).await.unwrap();
        assert_eq!(token.as_deref(), Some("token-123"));
    }

    #[tokio::test]
    async fn rejected_credentials_yield_no_token() {
        let url = test_server::spawn(provider).await;
        let auth = CognitoAuthenticator::with_endpoint(reqwest::Client::new(), url);
        assert_eq!(auth.access_token(&credentials("wrong")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn challenge_response_yields_no_token() {
        let url = test_server::spawn(provider).await;
        let auth = CognitoAuthenticator::with_endpoint(reqwest::Client::new(), url);
        assert_eq!(
            auth.access_token(&credentials("challenge")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_error() {
        let auth = CognitoAuthenticator::with_endpoint(reqwest::Client::new(), "http://127.0.0.1:1/");
        assert!(matches!(
            auth.access_token(&credentials("correct")).await,
            Err(AuthError::Request(_))
        ));
    }
}
