// Copyright 2025 Pitchside Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The production token-refresh exchange.

use crate::Result;
use crate::errors::AuthError;
use crate::token::{AuthResponse, TokenExchanger};

const REFRESH_PATH: &str = "/auth/refresh";

/// Exchanges a refresh token for a new credential at `POST /auth/refresh`.
///
/// The exchange goes straight through the transport rather than the request
/// pipeline: it supplies its credential in the body, never as a bearer
/// header, and must not itself be subject to the 401 refresh protocol.
#[derive(Clone, Debug)]
pub struct RefreshClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RefreshClient {
    /// Creates an exchanger against `<base_url>/auth/refresh`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH),
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[async_trait::async_trait]
impl TokenExchanger for RefreshClient {
    async fn exchange(&self, refresh_token: &str) -> Result<AuthResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(AuthError::Exchange)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ExchangeRejected {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<AuthResponse>()
            .await
            .map_err(AuthError::Exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use http::StatusCode;
    use http::header::AUTHORIZATION;
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinHandle;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    // Starts a refresh endpoint running locally. Returns a (base URL,
    // handle) pair. The handler verifies the request shape before answering
    // with the pre-canned response.
    async fn start(
        response_code: StatusCode,
        response_body: String,
        call_count: Arc<AtomicUsize>,
    ) -> (String, JoinHandle<()>) {
        let handler = move |headers: http::HeaderMap, Json(request): Json<Value>| async move {
            call_count.fetch_add(1, Ordering::SeqCst);
            assert!(headers.get(AUTHORIZATION).is_none(), "{headers:?}");
            assert_eq!(request["refreshToken"], "refresh-test-only");
            (response_code, response_body.clone())
        };
        let app = axum::Router::new().route("/auth/refresh", axum::routing::post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}:{}", addr.ip(), addr.port()), server)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn exchange_posts_refresh_token() -> TestResult {
        let body = serde_json::json!({
            "accessToken": "fresh",
            "refreshToken": "r2",
            "tokenType": "Bearer",
            "expiresInMs": 900_000,
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let (base_url, _server) = start(StatusCode::OK, body.to_string(), calls.clone()).await;

        let exchanger = RefreshClient::new(reqwest::Client::new(), &base_url);
        let response = exchanger.exchange("refresh-test-only").await?;
        assert_eq!(response.access_token.as_deref(), Some("fresh"));
        assert_eq!(response.refresh_token.as_deref(), Some("r2"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn trailing_slash_in_base_url_is_normalized() -> TestResult {
        let body = serde_json::json!({"accessToken": "fresh", "refreshToken": "r2"});
        let calls = Arc::new(AtomicUsize::new(0));
        let (base_url, _server) = start(StatusCode::OK, body.to_string(), calls).await;

        let exchanger = RefreshClient::new(reqwest::Client::new(), &format!("{base_url}/"));
        let response = exchanger.exchange("refresh-test-only").await?;
        assert_eq!(response.access_token.as_deref(), Some("fresh"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rejected_status_carries_body() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let (base_url, _server) =
            start(StatusCode::UNAUTHORIZED, "refresh token expired".into(), calls).await;

        let exchanger = RefreshClient::new(reqwest::Client::new(), &base_url);
        let err = exchanger.exchange("refresh-test-only").await.unwrap_err();
        match err {
            AuthError::ExchangeRejected { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("refresh token expired"), "{body}");
            }
            other => panic!("expected ExchangeRejected, got {other}"),
        }
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn malformed_body_is_an_exchange_error() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let (base_url, _server) = start(StatusCode::OK, "\"not a credential\"".into(), calls).await;

        let exchanger = RefreshClient::new(reqwest::Client::new(), &base_url);
        let err = exchanger.exchange("refresh-test-only").await.unwrap_err();
        assert!(matches!(err, AuthError::Exchange(_)), "{err}");
        Ok(())
    }
}
