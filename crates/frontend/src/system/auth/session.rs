use contracts::system::auth::User;

/// Coarse state derived from [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Loading,
    Authenticated,
    Error,
}

/// Auth slice of the app store.
///
/// `is_authenticated` implies `token.is_some()`. `user` is never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    /// State at startup: the persisted token is known, nothing is verified
    /// yet.
    pub fn initial(token: Option<String>) -> Self {
        Self {
            token,
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Loading
        } else if self.is_authenticated {
            AuthStatus::Authenticated
        } else if self.error.is_some() {
            AuthStatus::Error
        } else {
            AuthStatus::Anonymous
        }
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Dropping the token also drops authentication.
    pub fn set_token(&mut self, token: Option<String>) {
        if token.is_none() {
            self.is_authenticated = false;
        }
        self.token = token;
    }

    /// Ignored without a token.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.is_authenticated = authenticated && self.token.is_some();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn sign_in(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
        self.error = None;
    }

    /// Back to anonymous. `is_loading` is left alone.
    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.error = None;
    }
}

pub fn has_role(session: &Session, role: &str) -> bool {
    session.user.as_ref().is_some_and(|u| u.role == role)
}
