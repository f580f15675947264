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

//! Session establishment and teardown.
//!
//! Login and registration go through the ordinary pipeline: their paths are
//! auth endpoints, so no `Authorization` header is attached and a 401 from
//! them never triggers the refresh protocol.

use crate::http::ApiClient;
use crate::{Error, Result};
use auth::token::{AuthResponse, Credential};
use reqwest::Method;

#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// A registration request for `POST /auth/register`.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApiClient {
    /// Authenticates with the given account and stores the credential.
    ///
    /// A response without an access token is an error and clears any
    /// previously stored credential, like a failed refresh would.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let builder = self.request(Method::POST, "/auth/login");
        let response: AuthResponse = self
            .execute(builder, Some(&LoginRequest { email, password }))
            .await?;
        self.store_session(response).await
    }

    /// Registers a new account; the backend logs the account in as part of
    /// registration, so the returned credential is stored too.
    pub async fn register(&self, account: &NewAccount) -> Result<()> {
        let builder = self.request(Method::POST, "/auth/register");
        let response: AuthResponse = self.execute(builder, Some(account)).await?;
        self.store_session(response).await
    }

    /// Drops the stored session. No network call is made; the server-side
    /// tokens simply age out.
    pub async fn logout(&self) {
        self.store.clear().await;
    }

    /// Whether a session credential is currently stored.
    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await
    }

    async fn store_session(&self, response: AuthResponse) -> Result<()> {
        match Credential::from_auth_response(response, None) {
            Ok(credential) => {
                self.store.set(credential).await;
                Ok(())
            }
            Err(e) => {
                self.store.clear().await;
                Err(Error::authentication(e))
            }
        }
    }
}
