use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::provider::{AuthProvider, Session, SessionEvent, User};

pub const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: User,
    password_digest: Vec<u8>,
}

/// Process-local accounts and a single active session.
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            events,
        }
    }

    async fn start_session(&self, user: User) -> Session {
        let session = Session {
            user,
            access_token: Uuid::new_v4().to_string(),
            issued_at: Utc::now(),
        };
        *self.session.write().await = Some(session.clone());
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));
        session
    }
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AuthError::InvalidEmail(email)),
    }
}

fn digest(email: &str, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email)?;
        let user = {
            let accounts = self.accounts.read().await;
            match accounts.get(&email) {
                Some(account) if account.password_digest == digest(&email, password) => {
                    account.user.clone()
                }
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        info!("🔑 Signed in {}", user.email);
        Ok(self.start_session(user).await)
    }

    async fn register(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword { min: MIN_PASSWORD_LEN });
        }

        let user = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&email) {
                return Err(AuthError::UserExists(email));
            }
            let user = User {
                id: Uuid::new_v4().to_string(),
                email: email.clone(),
                created_at: Utc::now(),
            };
            accounts.insert(
                email.clone(),
                Account {
                    user: user.clone(),
                    password_digest: digest(&email, password),
                },
            );
            user
        };
        info!("🆕 Registered {}", user.email);
        Ok(self.start_session(user).await)
    }

    async fn logout(&self) -> Result<()> {
        if self.session.write().await.take().is_some() {
            debug!("👋 Session ended");
            let _ = self.events.send(SessionEvent::SignedOut);
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.session.read().await.as_ref().map(|s| s.user.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
