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
use crate::token::Credential;
use http::header::HeaderValue;

/// Builds the `Authorization` header value `"<tokenType> <accessToken>"`.
///
/// The value is marked sensitive so logging layers censor it.
pub(crate) fn authorization_value(credential: &Credential) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!(
        "{} {}",
        credential.token_type, credential.access_token
    ))?;
    value.set_sensitive(true);
    Ok(value)
}
