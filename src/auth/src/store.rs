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
use crate::headers;
use crate::token::Credential;
use http::header::HeaderValue;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The process-wide holder of the current [Credential].
///
/// Cloning the store yields another handle to the same state; one store is
/// created per client and shared by the pipeline, the refresh coordinator,
/// and the session operations. `set` and `clear` replace the whole
/// credential under a write lock, so readers never observe an access token
/// without its matching refresh token.
///
/// The store is passive: it notifies no one. Components read it when they
/// need the current state.
#[derive(Clone, Debug, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Credential>>>,
}

impl CredentialStore {
    /// Creates an empty store. No credential is present until a login,
    /// registration, or refresh stores one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current credential, if any.
    pub async fn get(&self) -> Option<Credential> {
        self.inner.read().await.clone()
    }

    /// Replaces the stored credential. All fields change together.
    pub async fn set(&self, credential: Credential) {
        *self.inner.write().await = Some(credential);
    }

    /// Drops the stored credential. Used on logout and on unrecoverable
    /// auth failure.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// Whether a credential is currently stored.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// The refresh token of the stored credential, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|c| c.refresh_token.clone())
    }

    /// The `Authorization` header value for the stored credential, or
    /// `None` when no credential is present.
    pub async fn authorization_value(&self) -> Result<Option<HeaderValue>> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(headers::authorization_value)
            .transpose()
    }
}
