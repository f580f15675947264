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

use crate::Result;
use crate::error::Error;
use auth::exchange::RefreshClient;
use auth::refresh::RefreshCoordinator;
use auth::store::CredentialStore;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The authenticated HTTP client for the Pitchside API.
///
/// Every endpoint wrapper funnels through the same pipeline. Before a
/// request is sent the pipeline forces JSON content negotiation (unless the
/// body is a multipart form, whose boundary belongs to the transport) and
/// attaches the `Authorization` header, except on OPTIONS requests and on
/// auth endpoints, which mint tokens rather than consume them. After a 401
/// on a non-auth endpoint the pipeline renews the credential through the
/// [RefreshCoordinator] and resends the request at most once.
///
/// Cloning is cheap; clones share the connection pool, the credential
/// store, and the refresh coordinator.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) inner: reqwest::Client,
    pub(crate) endpoint: String,
    pub(crate) store: CredentialStore,
    pub(crate) refresher: Arc<RefreshCoordinator<RefreshClient>>,
}

/// Configures and builds an [ApiClient].
pub struct Builder {
    endpoint: String,
    timeout: Duration,
    client: Option<reqwest::Client>,
}

impl Builder {
    /// Overrides the default 15 second request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies a preconfigured transport instead of building one.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let inner = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(Error::Builder)?,
        };
        let endpoint = self.endpoint.trim_end_matches('/').to_string();
        let store = CredentialStore::new();
        let refresher = Arc::new(RefreshCoordinator::new(
            store.clone(),
            RefreshClient::new(inner.clone(), &endpoint),
        ));
        Ok(ApiClient {
            inner,
            endpoint,
            store,
            refresher,
        })
    }
}

impl ApiClient {
    /// Starts building a client for the API at `endpoint`.
    pub fn builder<S: Into<String>>(endpoint: S) -> Builder {
        Builder {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// The credential store backing this client, for session observation.
    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .request(method, format!("{}{path}", &self.endpoint))
    }

    /// Sends a JSON request through the pipeline.
    pub(crate) async fn execute<I, O>(
        &self,
        builder: reqwest::RequestBuilder,
        body: Option<&I>,
    ) -> Result<O>
    where
        I: serde::ser::Serialize + ?Sized,
        O: serde::de::DeserializeOwned + Default,
    {
        let mut builder = builder
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build().map_err(Error::Request)?;
        self.send(request).await
    }

    /// Sends a multipart request through the pipeline. The transport picks
    /// its own boundary, so the content type is left untouched.
    pub(crate) async fn upload<O>(
        &self,
        builder: reqwest::RequestBuilder,
        form: reqwest::multipart::Form,
    ) -> Result<O>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let request = builder
            .header(ACCEPT, "application/json")
            .multipart(form)
            .build()
            .map_err(Error::Request)?;
        self.send(request).await
    }

    async fn send<O>(&self, mut request: reqwest::Request) -> Result<O>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let auth_endpoint = is_auth_path(request.url().path());
        self.apply_authorization(&mut request, auth_endpoint).await?;

        // Taken before the send consumes the request; `None` for streaming
        // bodies, which cannot be replayed.
        let retry = request.try_clone();

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.inner.execute(request).await.map_err(Error::send)?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            return into_body(response).await;
        }
        let error = service_error(response).await;
        if status == reqwest::StatusCode::UNAUTHORIZED && !auth_endpoint {
            return self.resend_unauthorized(retry, error).await;
        }
        Err(error)
    }

    /// Runs the refresh protocol for a request the server answered with
    /// 401, then resends it once. A 401 on the resent request lands in the
    /// plain error path below and never re-enters the protocol.
    async fn resend_unauthorized<O>(
        &self,
        retry: Option<reqwest::Request>,
        original: Error,
    ) -> Result<O>
    where
        O: serde::de::DeserializeOwned + Default,
    {
        let Some(mut request) = retry else {
            // The body cannot be replayed (multipart streams). Still run the
            // refresh protocol so the stored credential is renewed for the
            // caller's next attempt, then surface the original failure.
            return match self.refresher.renewed_authorization().await {
                Ok(_) => Err(original),
                Err(e) if e.requires_login() => Err(original),
                Err(e) => Err(Error::authentication(e)),
            };
        };
        match self.refresher.renewed_authorization().await {
            Ok(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
                tracing::debug!(url = %request.url(), "resending request with renewed credential");
                let response = self.inner.execute(request).await.map_err(Error::send)?;
                if response.status().is_success() {
                    into_body(response).await
                } else {
                    Err(service_error(response).await)
                }
            }
            // The session could not be renewed on this caller's behalf; the
            // caller-visible failure stays its own original 401.
            Err(e) if e.requires_login() => Err(original),
            Err(e) => Err(Error::authentication(e)),
        }
    }

    async fn apply_authorization(
        &self,
        request: &mut reqwest::Request,
        auth_endpoint: bool,
    ) -> Result<()> {
        if auth_endpoint || *request.method() == Method::OPTIONS {
            request.headers_mut().remove(AUTHORIZATION);
            return Ok(());
        }
        let value = self
            .store
            .authorization_value()
            .await
            .map_err(Error::authentication)?;
        match value {
            Some(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            None => {
                request.headers_mut().remove(AUTHORIZATION);
            }
        }
        Ok(())
    }
}

/// True when the path addresses an auth endpoint (`.../auth[/...]`).
///
/// Anchored on path segment boundaries so unrelated paths containing
/// "auth" as a substring are not misclassified.
pub(crate) fn is_auth_path(path: &str) -> bool {
    path.split('/').any(|segment| segment == "auth")
}

async fn service_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes().await.unwrap_or_default();
    Error::Service {
        status,
        headers,
        body,
    }
}

async fn into_body<O>(response: reqwest::Response) -> Result<O>
where
    O: serde::de::DeserializeOwned + Default,
{
    let body = response.bytes().await.map_err(Error::send)?;
    if body.is_empty() {
        // Bare acknowledgements (204, or 200 with no body) deserialize to
        // the output type's default.
        return Ok(O::default());
    }
    serde_json::from_slice(&body).map_err(Error::Deserialization)
}
