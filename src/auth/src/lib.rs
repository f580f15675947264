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

//! Pitchside Client Libraries for Rust - Authentication Components
//!
//! This crate owns the credential lifecycle for the Pitchside API: a
//! process-wide [CredentialStore], the wire types exchanged with the
//! `/auth/*` endpoints, and a [RefreshCoordinator] that renews an expired
//! access token at most once per expiry event, no matter how many requests
//! observe the expiry concurrently.
//!
//! The HTTP client in `pitchside-client` consumes these types; applications
//! normally do not use this crate directly except to inspect session state.
//!
//! [CredentialStore]: store::CredentialStore
//! [RefreshCoordinator]: refresh::RefreshCoordinator

pub mod errors;

/// Credential and auth-endpoint wire types.
pub mod token;

/// The process-wide credential holder.
pub mod store;

/// The single-flight refresh coordinator.
pub mod refresh;

/// The token-refresh exchange against `/auth/refresh`.
pub mod exchange;

pub(crate) mod headers;

/// A `Result` alias where the `Err` case is
/// `pitchside_auth::errors::AuthError`.
pub type Result<T> = std::result::Result<T, crate::errors::AuthError>;
