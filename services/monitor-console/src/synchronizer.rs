//! Fetches and submits the remote monitor/notification configuration

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::form::{ConfigForm, FormField};
use crate::notice::{Notice, NoticeSink};
use crate::session::SessionHandle;
use crate::ConsoleError;

/// Keeps the local editable form in step with the server
pub struct ConfigSynchronizer {
    api: Arc<ApiClient>,
    session: SessionHandle,
    notices: Arc<dyn NoticeSink>,
    form: RwLock<ConfigForm>,
}

impl std::fmt::Debug for ConfigSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSynchronizer")
            .field("api", &self.api)
            .finish()
    }
}

impl ConfigSynchronizer {
    pub fn new(api: Arc<ApiClient>, session: SessionHandle, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            api,
            session,
            notices,
            form: RwLock::new(ConfigForm::default()),
        }
    }

    /// Snapshot of the current form
    pub async fn form(&self) -> ConfigForm {
        self.form.read().await.clone()
    }

    pub async fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.form.write().await.set(field, value);
    }

    /// Replace the form with the server's configuration.
    ///
    /// Returns whether the form was replaced. On any failure the form is left
    /// exactly as it was and the reason is surfaced as a notice.
    pub async fn fetch_config(&self) -> bool {
        let credential = self.session.get().await;

        let fetched = match self.api.get_config(&credential).await {
            Ok(result) if result.is_success() => match result.payload("config") {
                Some(config) => ConfigForm::from_payload(config),
                None => Err(ConsoleError::Payload(
                    "response carries no config".to_string(),
                )),
            },
            Ok(result) => {
                self.notices.show(Notice::error(result.message()));
                return false;
            }
            Err(e) => Err(e),
        };

        match fetched {
            Ok(form) => {
                *self.form.write().await = form;
                tracing::info!("Configuration loaded");
                true
            }
            Err(e) => {
                tracing::warn!("Fetching configuration failed: {}", e);
                self.notices.show(Notice::error(e.to_string()));
                false
            }
        }
    }

    /// Send every form field to the server.
    ///
    /// On success a non-empty admin password in the form becomes the session
    /// credential before this returns, so the next request uses it.
    pub async fn submit_config(&self) -> bool {
        let credential = self.session.get().await;
        let form = self.form().await;

        match self.api.update_config(&credential, &form).await {
            Ok(result) if result.is_success() => {
                if let Some(new_password) = form.new_admin_password() {
                    if new_password != credential {
                        tracing::info!("Administrator password rotated");
                    }
                    self.session.set(new_password).await;
                }
                self.notices.show(Notice::info(result.message()));
                true
            }
            Ok(result) => {
                self.notices.show(Notice::error(result.message()));
                false
            }
            Err(e) => {
                tracing::warn!("Submitting configuration failed: {}", e);
                self.notices.show(Notice::error(e.to_string()));
                false
            }
        }
    }
}
