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
use crate::http::ApiClient;
use reqwest::Method;

/// The authenticated user's profile.
///
/// `avatar_path` is the durable storage path; `avatar_url` is a short-lived
/// signed URL the backend may include alongside it.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub avatar_path: Option<String>,
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A partial profile update; absent fields are left unchanged. Avatars are
/// updated through [ApiClient::upload_avatar], not here.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    #[default]
    Active,
    Inactive,
}

/// A referral code owned by the authenticated user.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCode {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub status: ReferralStatus,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

/// The stored avatar: durable path plus a short-lived signed URL.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub path: Option<String>,
    pub url: Option<String>,
}

impl ApiClient {
    pub async fn get_profile(&self) -> Result<UserProfile> {
        let builder = self.request(Method::GET, "/user-profiles/me");
        self.execute(builder, None::<&()>).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        let builder = self.request(Method::PUT, "/user-profiles/");
        self.execute(builder, Some(update)).await
    }

    pub async fn get_referral_code(&self) -> Result<ReferralCode> {
        let builder = self.request(Method::GET, "/referral-codes/user-actives");
        self.execute(builder, None::<&()>).await
    }

    /// Fetches the current avatar with a signed URL valid for
    /// `ttl_seconds` (default 3600).
    pub async fn get_avatar(&self, ttl_seconds: Option<u64>) -> Result<Avatar> {
        let builder = self
            .request(Method::GET, "/profile/avatar")
            .query(&[("ttl", ttl_seconds.unwrap_or(3600))]);
        self.execute(builder, None::<&()>).await
    }

    /// Uploads a new avatar as a multipart form. The form boundary is
    /// chosen by the transport; the pipeline does not touch the content
    /// type of this request.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<Avatar> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(Error::Request)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let builder = self.request(Method::POST, "/profile/avatar");
        self.upload(builder, form).await
    }
}
