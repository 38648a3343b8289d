use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nr_core::Notification;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::provider::{AuthProvider, SessionEvent, User};

/// Tracks the signed-in user for the application and reports every
/// login, registration and logout outcome as a notification.
pub struct AuthSession {
    provider: Arc<dyn AuthProvider>,
    user: Arc<RwLock<Option<User>>>,
    loading: Arc<AtomicBool>,
    notifications: mpsc::UnboundedSender<Notification>,
    listener: JoinHandle<()>,
}

impl AuthSession {
    /// Must be called from within a Tokio runtime.
    pub fn new(provider: Arc<dyn AuthProvider>) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifications, receiver) = mpsc::unbounded_channel();
        let user = Arc::new(RwLock::new(None));
        let loading = Arc::new(AtomicBool::new(true));

        let listener = tokio::spawn(follow_session(
            provider.clone(),
            provider.subscribe(),
            user.clone(),
            loading.clone(),
        ));

        let session = Self {
            provider,
            user,
            loading,
            notifications,
            listener,
        };
        (session, receiver)
    }

    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let outcome = self.with_loading(self.provider.login(email, password)).await;
        self.settle(
            outcome.map(|s| s.user),
            "Welcome back!",
            "You have successfully logged in.",
            "Login failed",
        )
        .await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        let outcome = self.with_loading(self.provider.register(email, password)).await;
        self.settle(
            outcome.map(|s| s.user),
            "Registration successful",
            "Please check your email to confirm your account.",
            "Registration failed",
        )
        .await
    }

    pub async fn logout(&self) -> Result<()> {
        let outcome = self.with_loading(self.provider.logout()).await;
        if outcome.is_ok() {
            *self.user.write().await = None;
        }
        self.notify(
            &outcome,
            "Logged out",
            "You have been successfully logged out.",
            "Logout failed",
        );
        outcome
    }

    async fn with_loading<T>(&self, call: impl std::future::Future<Output = T>) -> T {
        self.loading.store(true, Ordering::SeqCst);
        let result = call.await;
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn settle(
        &self,
        outcome: Result<User>,
        title: &str,
        description: &str,
        failure_title: &str,
    ) -> Result<User> {
        if let Ok(user) = &outcome {
            *self.user.write().await = Some(user.clone());
        }
        self.notify(&outcome, title, description, failure_title);
        outcome
    }

    fn notify<T>(&self, outcome: &Result<T>, title: &str, description: &str, failure_title: &str) {
        let notification = match outcome {
            Ok(_) => Notification::info(title, description),
            Err(e) => {
                warn!("⚠️ {}: {}", failure_title, e);
                Notification::error(failure_title, e.to_string())
            }
        };
        let _ = self.notifications.send(notification);
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Re-reads the provider on every event, so events queued before the first
/// read cannot roll the user back to an older state.
async fn follow_session(
    provider: Arc<dyn AuthProvider>,
    mut events: broadcast::Receiver<SessionEvent>,
    user: Arc<RwLock<Option<User>>>,
    loading: Arc<AtomicBool>,
) {
    resync(provider.as_ref(), &user).await;
    loading.store(false, Ordering::SeqCst);

    loop {
        match events.recv().await {
            Ok(event) => debug!("Session event: {:?}", event),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!("Missed {} session events, resyncing", missed)
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
        resync(provider.as_ref(), &user).await;
    }
}

async fn resync(provider: &dyn AuthProvider, user: &RwLock<Option<User>>) {
    match provider.current_user().await {
        Ok(current) => *user.write().await = current,
        Err(e) => warn!("⚠️ Error fetching user: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::memory::InMemoryAuthProvider;
    use nr_core::Severity;

    #[tokio::test]
    async fn test_login_flow_notifies() {
        let provider = Arc::new(InMemoryAuthProvider::new());
        let (session, mut notifications) = AuthSession::new(provider.clone());

        let user = session.register("reader@example.com", "secret123").await.unwrap();
        assert!(session.is_authenticated().await);
        assert_eq!(session.user().await, Some(user));
        let n = notifications.recv().await.unwrap();
        assert_eq!(n.title, "Registration successful");
        assert_eq!(n.severity, Severity::Info);

        session.logout().await.unwrap();
        assert!(!session.is_authenticated().await);
        assert_eq!(notifications.recv().await.unwrap().title, "Logged out");

        let err = session.login("reader@example.com", "nope-nope").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        let n = notifications.recv().await.unwrap();
        assert_eq!(n.title, "Login failed");
        assert_eq!(n.description, "Invalid login credentials");
        assert!(n.is_error());

        session.login("reader@example.com", "secret123").await.unwrap();
        assert_eq!(notifications.recv().await.unwrap().title, "Welcome back!");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_follows_sessions_started_elsewhere() {
        let provider = Arc::new(InMemoryAuthProvider::new());
        let (session, _notifications) = AuthSession::new(provider.clone());
        tokio::task::yield_now().await;

        let started = provider.register("other@example.com", "secret123").await.unwrap();
        for _ in 0..10 {
            if session.is_authenticated().await {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(session.user().await, Some(started.user));

        provider.logout().await.unwrap();
        for _ in 0..10 {
            if !session.is_authenticated().await {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_queued_events_do_not_restore_a_signed_out_user() {
        let provider = Arc::new(InMemoryAuthProvider::new());
        let (session, _notifications) = AuthSession::new(provider.clone());

        // Both events are queued before the listener first runs.
        provider.register("late@example.com", "secret123").await.unwrap();
        provider.logout().await.unwrap();

        for _ in 0..10 {
            tokio::task::yield_now().await;
            assert!(!session.is_authenticated().await);
        }
        assert!(!session.is_loading());
    }
}
