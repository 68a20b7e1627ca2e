//! Password-gated login loop

use std::sync::Arc;

use crate::api::ApiClient;
use crate::notice::{Notice, NoticeSink};
use crate::prompt::{CredentialPrompt, PromptReply};
use crate::session::SessionHandle;
use crate::ConsoleError;

/// Shown when the operator dismisses the prompt without a value
pub const PERMISSION_DENIED: &str = "Permission denied";

/// Prompts for the administrator password until the server accepts one
pub struct Authenticator {
    api: Arc<ApiClient>,
    session: SessionHandle,
    prompt: Arc<dyn CredentialPrompt>,
    notices: Arc<dyn NoticeSink>,
    max_attempts: Option<u32>,
}

impl Authenticator {
    pub fn new(
        api: Arc<ApiClient>,
        session: SessionHandle,
        prompt: Arc<dyn CredentialPrompt>,
        notices: Arc<dyn NoticeSink>,
        max_attempts: Option<u32>,
    ) -> Self {
        Self {
            api,
            session,
            prompt,
            notices,
            max_attempts,
        }
    }

    /// Prompt and submit until a credential is accepted.
    ///
    /// Every rejection, dismissal or transport failure is surfaced as a notice
    /// and followed by a new prompt. Gives up only when the prompt is closed or
    /// the configured attempt limit is used up.
    pub async fn login(&self) -> crate::Result<()> {
        let mut attempts = 0;

        loop {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                tracing::warn!("Giving up login after {} attempts", attempts);
                return Err(ConsoleError::LoginAbandoned { attempts });
            }
            attempts += 1;

            let credential = match self.prompt.ask().await {
                PromptReply::Entered(credential) => credential,
                PromptReply::Cancelled => {
                    self.notices.show(Notice::error(PERMISSION_DENIED));
                    continue;
                }
                PromptReply::Closed => {
                    tracing::info!("Credential prompt closed");
                    return Err(ConsoleError::LoginAbandoned { attempts });
                }
            };

            match self.api.login(&credential).await {
                Ok(result) if result.is_success() => {
                    self.session.set(credential).await;
                    tracing::info!("Logged in after {} attempt(s)", attempts);
                    return Ok(());
                }
                Ok(result) => {
                    tracing::debug!("Login attempt {} rejected", attempts);
                    self.notices.show(Notice::error(result.message()));
                }
                Err(e) => {
                    tracing::warn!("Login request failed: {}", e);
                    self.notices.show(Notice::error(e.to_string()));
                }
            }
        }
    }
}
