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

//! Pitchside Client Libraries for Rust - API Client
//!
//! [ApiClient] is the entry point: it owns the request pipeline that
//! attaches bearer credentials, detects access-token expiry (HTTP 401) on
//! any in-flight request, refreshes the token exactly once per expiry
//! event, and transparently resends the affected requests. Callers see each
//! request succeed or fail once, terminally; a recovered expiry is
//! invisible.
//!
//! ```no_run
//! # use pitchside_client::ApiClient;
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder("https://api.example.com/v1").build()?;
//! client.login("player@example.com", "secret").await?;
//! let matches = client.list_matches(0).await?;
//! println!("{} matches open", matches.len());
//! # Ok::<(), pitchside_client::Error>(())
//! # });
//! ```

pub mod error;

/// The request pipeline and client builder.
pub mod http;

/// Login, registration, and logout.
pub mod session;

/// Match listings.
pub mod matches;

/// Wallet balance and transactions.
pub mod wallets;

/// User profile, referral codes, and avatars.
pub mod profiles;

/// Joining matches.
pub mod participants;

/// E-mail verification codes.
pub mod otp;

pub use crate::error::Error;
pub use crate::http::{ApiClient, Builder};

/// A `Result` alias where the `Err` case is `pitchside_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;
