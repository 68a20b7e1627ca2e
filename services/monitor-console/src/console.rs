//! Console controller: login, then configuration sync and status polling

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::authenticator::Authenticator;
use crate::config::Config;
use crate::io::HttpClient;
use crate::notice::NoticeSink;
use crate::poller::{PollHandle, StatusPoller};
use crate::prompt::CredentialPrompt;
use crate::session::SessionHandle;
use crate::synchronizer::ConfigSynchronizer;

/// Where the console is in its lifecycle. There is no way back once authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl fmt::Display for ConsoleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleState::Unauthenticated => write!(f, "Unauthenticated"),
            ConsoleState::Authenticating => write!(f, "Authenticating"),
            ConsoleState::Authenticated => write!(f, "Authenticated"),
        }
    }
}

/// Owns the session and every component that uses it
pub struct Console {
    state: RwLock<ConsoleState>,
    session: SessionHandle,
    authenticator: Authenticator,
    synchronizer: ConfigSynchronizer,
    poller: StatusPoller,
    cancel: CancellationToken,
}

impl Console {
    pub fn new(
        config: &Config,
        http: Arc<dyn HttpClient>,
        prompt: Arc<dyn CredentialPrompt>,
        notices: Arc<dyn NoticeSink>,
        cancel: CancellationToken,
    ) -> Self {
        let api = Arc::new(ApiClient::new(&config.server.base_url, http));
        let session = SessionHandle::new();

        let authenticator = Authenticator::new(
            Arc::clone(&api),
            session.clone(),
            prompt,
            Arc::clone(&notices),
            config.login.max_attempts,
        );
        let synchronizer =
            ConfigSynchronizer::new(Arc::clone(&api), session.clone(), Arc::clone(&notices));
        let poller = StatusPoller::new(api, session.clone(), notices, config.poller.interval());

        Self {
            state: RwLock::new(ConsoleState::Unauthenticated),
            session,
            authenticator,
            synchronizer,
            poller,
            cancel,
        }
    }

    pub async fn state(&self) -> ConsoleState {
        *self.state.read().await
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn synchronizer(&self) -> &ConfigSynchronizer {
        &self.synchronizer
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Log in, start the status poller, then load the configuration.
    ///
    /// The poller and the fetch are started back to back with no ordering
    /// between their first requests. The returned handle stops the poller; it
    /// is also stopped when the console's cancellation token fires.
    pub async fn start(&self) -> crate::Result<PollHandle> {
        *self.state.write().await = ConsoleState::Authenticating;

        if let Err(e) = self.authenticator.login().await {
            *self.state.write().await = ConsoleState::Unauthenticated;
            return Err(e);
        }
        *self.state.write().await = ConsoleState::Authenticated;

        let handle = self.poller.start(self.cancel.child_token());
        self.synchronizer.fetch_config().await;

        Ok(handle)
    }
}
