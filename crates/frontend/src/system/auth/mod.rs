pub mod api;
pub mod context;
pub mod coordinator;
pub mod guard;
pub mod session;
pub mod storage;

pub use context::{use_auth, AuthStore};
pub use coordinator::SessionCoordinator;
pub use guard::{RequireAuth, RequireRole};
pub use session::{has_role, AuthStatus, Session};
