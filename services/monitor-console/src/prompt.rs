//! Credential prompt

use async_trait::async_trait;

/// What the operator did when asked for the administrator password
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    Entered(String),
    /// The operator declined to enter a value
    Cancelled,
    /// No further input will arrive
    Closed,
}

/// Trait for asking the operator for a credential
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn ask(&self) -> PromptReply;
}

/// Reads the password from the controlling terminal without echo
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    label: String,
}

impl TerminalPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new("Administrator password: ")
    }
}

#[async_trait]
impl CredentialPrompt for TerminalPrompt {
    async fn ask(&self) -> PromptReply {
        let label = self.label.clone();
        let read = tokio::task::spawn_blocking(move || rpassword::prompt_password(label)).await;

        match read {
            Ok(Ok(value)) => reply_for(value),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => PromptReply::Closed,
            Ok(Err(e)) => {
                tracing::warn!("Reading password failed: {}", e);
                PromptReply::Closed
            }
            Err(e) => {
                tracing::warn!("Password prompt task failed: {}", e);
                PromptReply::Closed
            }
        }
    }
}

fn reply_for(value: String) -> PromptReply {
    if value.is_empty() {
        PromptReply::Cancelled
    } else {
        PromptReply::Entered(value)
    }
}
