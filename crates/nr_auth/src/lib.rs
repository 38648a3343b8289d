//! Login and registration, treated as an external collaborator of the news core.

pub mod error;
pub mod memory;
pub mod provider;
pub mod session;

pub use error::AuthError;
pub use memory::InMemoryAuthProvider;
pub use provider::{AuthProvider, Session, SessionEvent, User};
pub use session::AuthSession;

pub mod prelude {
    pub use super::{
        AuthError, AuthProvider, AuthSession, InMemoryAuthProvider, Session, SessionEvent, User,
    };
}
