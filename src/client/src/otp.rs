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
use crate::http::ApiClient;
use reqwest::Method;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpKind {
    #[default]
    EmailVerify,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestOtp<'a> {
    #[serde(rename = "type")]
    kind: OtpKind,
    destination: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtp<'a> {
    #[serde(rename = "type")]
    kind: OtpKind,
    code: &'a str,
}

/// The backend's answer to an OTP verification.
///
/// Whether a `success: false` flag is a hard failure is caller policy; the
/// pipeline only guarantees the HTTP exchange succeeded.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiClient {
    /// Sends (or resends) an e-mail verification code.
    pub async fn request_email_code(&self, email: &str) -> Result<()> {
        let builder = self.request(Method::POST, "/otp");
        self.execute(
            builder,
            Some(&RequestOtp {
                kind: OtpKind::EmailVerify,
                destination: email,
            }),
        )
        .await
    }

    /// Verifies an e-mail verification code.
    pub async fn verify_email_code(&self, code: &str) -> Result<OtpOutcome> {
        let builder = self.request(Method::POST, "/otp/verify");
        self.execute(
            builder,
            Some(&VerifyOtp {
                kind: OtpKind::EmailVerify,
                code,
            }),
        )
        .await
    }
}
