//! Auth slice of the app store: session state plus the login, register,
//! logout and restore flows.

use std::future::Future;
use std::sync::Arc;

use contracts::system::auth::{AuthPayload, LoginCredentials, RegisterCredentials};
use leptos::prelude::*;

use super::session::{self, Session};
use super::{api, storage};
use crate::shared::api::{ApiClient, ApiError};
use crate::shared::storage::KeyValueStore;

const MSG_LOGIN_OK: &str = "Login successful";
const MSG_LOGIN_FAILED: &str = "Login failed";
const MSG_REGISTER_OK: &str = "Registration successful";
const MSG_REGISTER_FAILED: &str = "Registration failed";
const MSG_LOGGED_OUT: &str = "Logged out successfully";

/// Sets `is_loading` for as long as it lives.
struct LoadingScope {
    session: RwSignal<Session>,
}

impl LoadingScope {
    fn enter(session: RwSignal<Session>) -> Self {
        session.update(|s| s.set_loading(true));
        Self { session }
    }
}

impl Drop for LoadingScope {
    fn drop(&mut self) {
        let _ = self.session.try_update(|s| s.set_loading(false));
    }
}

#[derive(Clone)]
pub struct AuthStore {
    session: RwSignal<Session>,
    client: ApiClient,
    storage: Arc<dyn KeyValueStore>,
}

impl AuthStore {
    pub fn new(client: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        let token = storage::load_token(storage.as_ref());
        Self {
            session: RwSignal::new(Session::initial(token)),
            client,
            storage,
        }
    }

    pub fn session(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn snapshot(&self) -> Session {
        self.session.get_untracked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.session.with(|s| s.is_loading)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.session.with(|s| session::has_role(s, role))
    }

    /// Persist (or remove) the token and mirror it into the session.
    pub fn set_token(&self, token: Option<String>) {
        match &token {
            Some(token) => storage::save_token(self.storage.as_ref(), token),
            None => storage::clear_token(self.storage.as_ref()),
        }
        self.session.update(|s| s.set_token(token));
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        self.authenticate(api::login(&self.client, credentials), MSG_LOGIN_OK, MSG_LOGIN_FAILED)
            .await
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> bool {
        self.authenticate(
            api::register(&self.client, credentials),
            MSG_REGISTER_OK,
            MSG_REGISTER_FAILED,
        )
        .await
    }

    async fn authenticate<Fut>(&self, call: Fut, success: &str, failure: &str) -> bool
    where
        Fut: Future<Output = Result<AuthPayload, ApiError>>,
    {
        let _loading = LoadingScope::enter(self.session);
        self.session.update(|s| s.set_error(None));

        let notifier = self.client.notifier();
        match call.await {
            Ok(AuthPayload { user, token }) => {
                log::info!("signed in as {} ({})", user.name, user.role);
                storage::save_token(self.storage.as_ref(), &token);
                self.session.update(|s| s.sign_in(user, token));
                notifier.success(success);
                true
            }
            Err(e) => {
                log::warn!("{}: {}", failure, e);
                let message = e.server_message().unwrap_or_else(|| failure.to_string());
                self.session.update(|s| s.set_error(Some(message.clone())));
                notifier.error(message);
                false
            }
        }
    }

    /// Local only; the server is not told.
    pub fn logout(&self) {
        self.expire_session();
        self.client.notifier().success(MSG_LOGGED_OUT);
    }

    /// Drop token and user without a notification.
    pub fn expire_session(&self) {
        storage::clear_token(self.storage.as_ref());
        self.session.update(|s| s.clear());
    }

    /// Trust a persisted token without asking the server.
    /// [`verify_session`](Self::verify_session) checks it later.
    pub fn restore_auth(&self) {
        let _loading = LoadingScope::enter(self.session);
        let token = storage::load_token(self.storage.as_ref());
        self.session.update(|s| {
            let has_token = token.is_some();
            s.set_token(token);
            if has_token {
                s.set_authenticated(true);
            }
        });
    }

    /// Confirm the persisted token with `GET /auth/me`. An unreachable
    /// server keeps the optimistic session; any other failure signs out.
    pub async fn verify_session(&self) {
        let Some(token) = self.session.with_untracked(|s| s.token.clone()) else {
            return;
        };

        let result = api::current_user(&self.client).await;

        // signed out or in again meanwhile
        if self.session.with_untracked(|s| s.token.as_ref() != Some(&token)) {
            return;
        }
        match result {
            Ok(user) => self.session.update(|s| s.set_user(Some(user))),
            Err(ApiError::NetworkUnreachable(reason)) => {
                log::warn!("could not verify session, keeping it: {}", reason);
            }
            Err(e) => {
                log::warn!("session rejected: {}", e);
                self.expire_session();
            }
        }
    }
}

pub fn use_auth() -> AuthStore {
    use_context::<AuthStore>().expect("AuthStore not found. Wrap your app with AppProviders.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notifications::ToastLevel;
    use crate::shared::storage::TOKEN_KEY;
    use crate::shared::testing::{block_on, Harness};
    use serde_json::json;

    fn auth(h: &Harness) -> AuthStore {
        AuthStore::new(h.client.clone(), h.storage.clone())
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            email: "ada@example.com".into(),
            password: "secret".into(),
        }
    }

    fn user_json() -> serde_json::Value {
        json!({"id": "u1", "name": "Ada", "role": "admin"})
    }

    #[test]
    fn test_initial_session_reads_persisted_token() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "persisted");
        let session = auth(&h).snapshot();
        assert_eq!(session.token.as_deref(), Some("persisted"));
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
    }

    #[test]
    fn test_login_success() {
        let h = Harness::new();
        h.transport.respond(200, json!({"data": {"user": user_json(), "token": "tok"}}));
        let auth = auth(&h);

        assert!(block_on(auth.login(&credentials())));

        let session = auth.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.user.unwrap().name, "Ada");
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("tok"));
        assert!(h.transport.last_request().url.ends_with("/auth/login"));
        assert_eq!(h.notifier.snapshot()[0].message, MSG_LOGIN_OK);
    }

    #[test]
    fn test_login_accepts_numeric_user_id() {
        let h = Harness::new();
        h.transport.respond(
            200,
            json!({"data": {"user": {"id": 42, "name": "Ada", "role": "admin"}, "token": "tok"}}),
        );
        let auth = auth(&h);

        assert!(block_on(auth.login(&credentials())));

        let session = auth.snapshot();
        assert!(session.is_authenticated);
        assert_eq!(session.user.map(|u| u.id).as_deref(), Some("42"));
        assert_eq!(session.error, None);
    }

    #[test]
    fn test_login_failure_reports_server_message() {
        let h = Harness::new();
        h.transport.respond(400, json!({"message": "Invalid credentials"}));
        let auth = auth(&h);

        assert!(!block_on(auth.login(&credentials())));

        let session = auth.snapshot();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        let toasts = h.notifier.snapshot();
        assert_eq!(toasts[0].message, "Invalid credentials");
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }

    #[test]
    fn test_register_failure_default_message() {
        let h = Harness::new();
        h.transport.respond(409, json!({}));
        let auth = auth(&h);

        let registered = block_on(auth.register(&RegisterCredentials {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        }));

        assert!(!registered);
        assert_eq!(auth.snapshot().error.as_deref(), Some(MSG_REGISTER_FAILED));
        assert!(h.transport.last_request().url.ends_with("/auth/register"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let h = Harness::new();
        h.transport.respond(200, json!({"data": {"user": user_json(), "token": "tok"}}));
        let auth = auth(&h);
        block_on(auth.login(&credentials()));

        auth.logout();

        let session = auth.snapshot();
        assert_eq!(session.token, None);
        assert_eq!(session.user, None);
        assert!(!session.is_authenticated);
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(h.notifier.snapshot().last().unwrap().message, MSG_LOGGED_OUT);
    }

    #[test]
    fn test_restore_auth_is_optimistic() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "persisted");
        let auth = auth(&h);

        auth.restore_auth();

        let session = auth.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(h.transport.request_count(), 0);
    }

    #[test]
    fn test_restore_auth_without_token() {
        let h = Harness::new();
        let auth = auth(&h);
        auth.restore_auth();
        let session = auth.snapshot();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
    }

    #[test]
    fn test_verify_session_fills_user() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "persisted");
        h.transport.respond(200, json!({"data": user_json()}));
        let auth = auth(&h);
        auth.restore_auth();

        block_on(auth.verify_session());

        assert!(auth.snapshot().is_authenticated);
        assert!(auth.has_role("admin"));
        assert!(h.transport.last_request().url.ends_with("/auth/me"));
    }

    #[test]
    fn test_verify_session_rejected_token_signs_out() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "revoked");
        h.transport.respond(401, json!({"message": "jwt expired"}));
        let auth = auth(&h);
        auth.restore_auth();

        block_on(auth.verify_session());

        assert!(!auth.snapshot().is_authenticated);
        assert_eq!(h.storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_verify_session_offline_keeps_session() {
        let h = Harness::new();
        h.storage.set(TOKEN_KEY, "persisted");
        h.transport.fail("offline");
        let auth = auth(&h);
        auth.restore_auth();

        block_on(auth.verify_session());

        assert!(auth.snapshot().is_authenticated);
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("persisted"));
    }

    #[test]
    fn test_set_token_persists() {
        let h = Harness::new();
        let auth = auth(&h);
        auth.set_token(Some("abc".into()));
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("abc"));
        auth.set_token(None);
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(auth.snapshot().token, None);
    }
}
