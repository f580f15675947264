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

use auth::errors::AuthError;
use bytes::Bytes;
use http::HeaderMap;

/// The error type for all [ApiClient](crate::ApiClient) operations.
///
/// The pipeline recovers exactly one class of failure internally (an
/// expired access token, via the refresh protocol); everything else
/// surfaces here unchanged. A [Service](Error::Service) error carries the
/// status, headers, and raw payload of the rejected exchange so callers can
/// apply their own policy, notably for 403, which the pipeline never
/// interprets.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The HTTP transport could not be initialized.
    #[error("could not initialize the HTTP transport")]
    Builder(#[source] reqwest::Error),

    /// The outgoing request could not be built.
    #[error("could not build the request")]
    Request(#[source] reqwest::Error),

    /// The request timed out before a response arrived.
    #[error("the request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The request failed below the HTTP layer; no response was received.
    #[error("transport error")]
    Io(#[source] reqwest::Error),

    /// The response body could not be deserialized.
    #[error("could not deserialize the response body")]
    Deserialization(#[source] serde_json::Error),

    /// The service answered with a non-success status.
    #[error("the service rejected the request with HTTP status {status}")]
    Service {
        status: u16,
        headers: HeaderMap,
        body: Bytes,
    },

    /// Establishing or renewing the session credential failed.
    #[error("authentication error")]
    Authentication(#[source] AuthError),
}

impl Error {
    /// The HTTP status of a [Service](Error::Service) error.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response headers of a [Service](Error::Service) error.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        match self {
            Error::Service { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// The raw response payload of a [Service](Error::Service) error.
    pub fn http_payload(&self) -> Option<&Bytes> {
        match self {
            Error::Service { body, .. } => Some(body),
            _ => None,
        }
    }

    pub(crate) fn send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else {
            Error::Io(err)
        }
    }

    pub(crate) fn authentication(err: AuthError) -> Self {
        Error::Authentication(err)
    }
}
