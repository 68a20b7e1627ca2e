//! In-memory administrator session

use std::sync::Arc;

use tokio::sync::RwLock;

/// The credential the console authenticates with
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub credential: String,
    pub authenticated: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

/// Shared handle to the session, cloned into every component that sends requests
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current credential, empty before the first successful login
    pub async fn get(&self) -> String {
        self.inner.read().await.credential.clone()
    }

    /// Replace the credential and mark the session authenticated
    pub async fn set(&self, credential: impl Into<String>) {
        let mut session = self.inner.write().await;
        session.credential = credential.into();
        session.authenticated = true;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.authenticated
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }
}
