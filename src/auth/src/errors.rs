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

/// Represents an error establishing or renewing a session credential.
///
/// The request pipeline treats [MissingRefreshToken] and [SessionExpired] as
/// "surface the caller's own original error": both mean the session could not
/// be renewed on this caller's behalf, and the caller-visible failure should
/// stay "your session expired" rather than leak the renewal attempt. Every
/// other variant is a failure of the renewal itself and propagates as-is to
/// the request that triggered it.
///
/// [MissingRefreshToken]: AuthError::MissingRefreshToken
/// [SessionExpired]: AuthError::SessionExpired
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AuthError {
    /// No refresh token is stored, so no renewal can be attempted.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// A refresh performed by another request failed; the session is gone.
    #[error("session expired and could not be renewed")]
    SessionExpired,

    /// The refresh exchange failed at the transport level.
    #[error("token refresh request failed")]
    Exchange(#[source] reqwest::Error),

    /// The refresh endpoint answered with a non-success status.
    #[error("token refresh rejected with HTTP status {status}: {body}")]
    ExchangeRejected { status: u16, body: String },

    /// The auth endpoint answered 2xx but the body was not a usable
    /// credential.
    #[error("auth response is missing an access token")]
    MissingAccessToken,

    /// The stored token cannot be encoded as an `Authorization` header.
    #[error("credential cannot be encoded as an Authorization header")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

impl AuthError {
    /// True when the failure means "renew the session by logging in again",
    /// as opposed to a transient exchange failure.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AuthError::MissingRefreshToken | AuthError::SessionExpired
        )
    }
}
