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

//! Credential types and the wire shapes of the `/auth/*` endpoints.

use crate::Result;
use crate::errors::AuthError;
use std::time::Duration;

/// The token type used when the server omits one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// The advisory token lifetime used when the server omits one.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_millis(900_000);

/// A complete session credential.
///
/// The access and refresh tokens travel together: there is no state in which
/// one is present and the other absent. `expires_in` is an advisory hint
/// only; expiry is detected reactively, by a 401 from the server.
#[derive(Clone, PartialEq)]
pub struct Credential {
    /// The bearer token attached to authenticated calls.
    pub access_token: String,

    /// Exchanged for a new access token when the access token expires.
    pub refresh_token: String,

    /// The scheme in the `Authorization` header, normally `"Bearer"`.
    pub token_type: String,

    /// Advisory lifetime reported by the server. Never used to proactively
    /// expire the credential.
    pub expires_in: Duration,
}

impl Credential {
    /// Validates an auth-endpoint response into a credential.
    ///
    /// `prior_refresh_token` is the fallback when the server rotates only
    /// the access token; pass `None` for login and registration, where the
    /// response must be self-contained.
    pub fn from_auth_response(
        response: AuthResponse,
        prior_refresh_token: Option<String>,
    ) -> Result<Self> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;
        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or(prior_refresh_token)
            .ok_or(AuthError::MissingRefreshToken)?;
        Ok(Credential {
            access_token,
            refresh_token,
            token_type: response
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_in: response
                .expires_in_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TOKEN_LIFETIME),
        })
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[censored]")
            .field("refresh_token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// The response body shared by `/auth/login`, `/auth/register`, and
/// `/auth/refresh`.
///
/// Every field is optional so that a malformed response surfaces as a
/// validation error in [Credential::from_auth_response] instead of a
/// deserialization failure with no context.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_ms: Option<u64>,
}

/// Performs the token-refresh exchange.
///
/// The production implementation is [RefreshClient]; tests substitute a
/// mock to drive the [RefreshCoordinator] deterministically.
///
/// [RefreshClient]: crate::exchange::RefreshClient
/// [RefreshCoordinator]: crate::refresh::RefreshCoordinator
#[async_trait::async_trait]
pub trait TokenExchanger: std::fmt::Debug + Send + Sync {
    async fn exchange(&self, refresh_token: &str) -> Result<AuthResponse>;
}
