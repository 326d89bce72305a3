//! Auth/session controller.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use backoffice_client::{BackofficeClient, LoginCredentials, UserPublic, UserRegister};
use backoffice_query::QueryCache;
use backoffice_session::TokenStore;

use crate::keys;
use crate::queries;
use crate::shell::{Destination, Navigator, NoticeKind, Notifier};

/// Owns the session lifecycle: login, logout, registration, and the
/// current-user read.
///
/// The controller wires the query cache's 401 reaction back into its own
/// logout sequence at construction time, so an expired token observed by
/// any authenticated read runs the same teardown a user-initiated logout
/// does.
#[derive(Clone)]
pub struct AuthController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: BackofficeClient,
    session: Arc<dyn TokenStore>,
    cache: QueryCache,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    /// Last login failure, readable by the shell until reset.
    error: RwLock<Option<String>>,
}

/// The logout sequence: drop the token, drop the cached current user, and
/// return to the login entry point. Safe to run when already logged out.
async fn perform_logout(
    session: &Arc<dyn TokenStore>,
    cache: &QueryCache,
    navigator: &Arc<dyn Navigator>,
) {
    if let Err(err) = session.clear() {
        warn!(error = %err, "Failed to clear session token");
    }

    let key = keys::current_user();
    cache.invalidate(&key).await;
    cache.remove(&key).await;

    navigator.navigate(Destination::Login);
    debug!("Logged out");
}

impl AuthController {
    /// Create a controller and install the cache's unauthorized hook.
    pub fn new(
        client: BackofficeClient,
        session: Arc<dyn TokenStore>,
        cache: QueryCache,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        {
            // The hook receives the cache as an argument rather than
            // capturing it, which keeps the cache from owning a closure
            // that owns the cache.
            let session = Arc::clone(&session);
            let navigator = Arc::clone(&navigator);
            cache.set_unauthorized_hook(Arc::new(move |cache| {
                let session = Arc::clone(&session);
                let navigator = Arc::clone(&navigator);
                Box::pin(async move {
                    perform_logout(&session, &cache, &navigator).await;
                })
            }));
        }

        Self {
            inner: Arc::new(ControllerInner {
                client,
                session,
                cache,
                navigator,
                notifier,
                error: RwLock::new(None),
            }),
        }
    }

    /// Submit a registration.
    ///
    /// Success navigates to the login entry point with a success
    /// notification; failure emits an error notification with the message
    /// extracted from the error body. Either way the users namespace is
    /// marked stale so listings reflect the attempt.
    pub async fn register(&self, data: &UserRegister) -> backoffice_client::Result<UserPublic> {
        let result = self.inner.client.users().signup(data).await;

        match &result {
            Ok(user) => {
                debug!(email = %user.email, "User registered");
                self.inner.navigator.navigate(Destination::Login);
                self.inner.notifier.notify(
                    "Account created",
                    "Your account has been created. You can log in now.",
                    NoticeKind::Success,
                );
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %message, "Registration failed");
                self.inner
                    .notifier
                    .notify("Registration failed", &message, NoticeKind::Error);
            }
        }

        self.inner
            .cache
            .invalidate_prefix(&keys::users_namespace())
            .await;

        result
    }

    /// Submit credentials for a token.
    ///
    /// On success the token is persisted and navigation goes home, which
    /// re-enables session-gated queries. On failure the extracted message
    /// lands in [`last_error`](Self::last_error); the token and location
    /// are untouched. Returns whether the login succeeded.
    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        match self.inner.client.auth().login(credentials).await {
            Ok(token) => {
                if let Err(err) = self.inner.session.set(&token.access_token) {
                    let message = err.to_string();
                    warn!(error = %message, "Failed to persist session token");
                    *self.inner.error.write() = Some(message);
                    return false;
                }

                *self.inner.error.write() = None;
                self.inner.navigator.navigate(Destination::Home);
                debug!("Login succeeded");
                true
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %message, "Login failed");
                *self.inner.error.write() = Some(message);
                false
            }
        }
    }

    /// Run the logout sequence. Idempotent: logging out while anonymous
    /// performs the same steps harmlessly, with no network calls.
    pub async fn logout(&self) {
        perform_logout(&self.inner.session, &self.inner.cache, &self.inner.navigator).await;
    }

    /// The current authenticated user, via the query cache. Disabled while
    /// anonymous; a 401 here runs the full teardown.
    pub async fn current_user(&self) -> backoffice_query::Result<UserPublic> {
        queries::current_user(&self.inner.cache, &self.inner.client).await
    }

    /// Last login failure message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.inner.error.read().clone()
    }

    /// Clear the stored login failure message.
    pub fn reset_error(&self) {
        *self.inner.error.write() = None;
    }

    /// Whether a session token is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    /// The query cache shared with the rest of the SDK.
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// The typed API client.
    pub fn client(&self) -> &BackofficeClient {
        &self.inner.client
    }
}
