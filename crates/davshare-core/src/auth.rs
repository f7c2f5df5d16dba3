//! Credential checks performed before any resource access.
//!
//! An [`AuthGate`] pairs a realm label with an [`AuthPolicy`]. The gate is
//! stateless: every call is independent and has no side effects.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Realm used when none is configured.
pub const DEFAULT_REALM: &str = "davshare";

/// Decides whether a username/secret pair may access the tree.
pub trait AuthPolicy: Send + Sync {
    fn validate(&self, username: &str, secret: &str) -> bool;
}

/// Accepts every credential pair, including empty ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthPolicy for AllowAll {
    fn validate(&self, _username: &str, _secret: &str) -> bool {
        true
    }
}

/// Delegates to a closure supplied at startup.
pub struct CallbackPolicy<F> {
    callback: F,
}

impl<F> CallbackPolicy<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> AuthPolicy for CallbackPolicy<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn validate(&self, username: &str, secret: &str) -> bool {
        (self.callback)(username, secret)
    }
}

impl<F> fmt::Debug for CallbackPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackPolicy").finish_non_exhaustive()
    }
}

/// Accepts exactly one username/password pair.
///
/// The password comparison runs in constant time.
#[derive(Debug)]
pub struct StaticCredentials {
    username: String,
    password: SecretString,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl AuthPolicy for StaticCredentials {
    fn validate(&self, username: &str, secret: &str) -> bool {
        let password_ok: bool = self
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(secret.as_bytes())
            .into();
        password_ok && username == self.username
    }
}

/// Approves or rejects each inbound request.
#[derive(Clone)]
pub struct AuthGate {
    policy: Arc<dyn AuthPolicy>,
    realm: String,
}

impl AuthGate {
    pub fn new(policy: impl AuthPolicy + 'static, realm: impl Into<String>) -> Self {
        Self {
            policy: Arc::new(policy),
            realm: realm.into(),
        }
    }

    /// Gate that lets every request through, under [`DEFAULT_REALM`].
    pub fn allow_all() -> Self {
        Self::new(AllowAll, DEFAULT_REALM)
    }

    /// Label shown to clients when credentials are requested.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Returns true if the pair is accepted by the configured policy.
    pub fn authenticate(&self, username: &str, secret: &str) -> bool {
        let allowed = self.policy.validate(username, secret);
        if !allowed {
            debug!(username = %username, realm = %self.realm, "credentials rejected");
        }
        allowed
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}
