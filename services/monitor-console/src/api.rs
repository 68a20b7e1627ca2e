//! Client for the monitor server's admin API

use std::sync::Arc;

use crate::envelope::ApiResult;
use crate::form::ConfigForm;
use crate::io::HttpClient;
use crate::ConsoleError;

pub const LOGIN_PATH: &str = "api/v1/login";
pub const GET_CONFIG_PATH: &str = "api/v1/get_config";
pub const UPDATE_CONFIG_PATH: &str = "api/v1/update_config";
pub const STATUS_PATH: &str = "api/v1/update";

/// Query parameter carrying the administrator credential on every call
pub const CREDENTIAL_PARAM: &str = "admin_password";

/// Typed access to the four admin endpoints
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created ApiClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn login(&self, credential: &str) -> crate::Result<ApiResult> {
        self.call(LOGIN_PATH, &[(CREDENTIAL_PARAM, credential)])
            .await
    }

    pub async fn get_config(&self, credential: &str) -> crate::Result<ApiResult> {
        self.call(GET_CONFIG_PATH, &[(CREDENTIAL_PARAM, credential)])
            .await
    }

    pub async fn update_config(
        &self,
        credential: &str,
        form: &ConfigForm,
    ) -> crate::Result<ApiResult> {
        let mut params = vec![(CREDENTIAL_PARAM, credential)];
        params.extend(form.update_params());
        self.call(UPDATE_CONFIG_PATH, &params).await
    }

    pub async fn status(&self, credential: &str) -> crate::Result<ApiResult> {
        self.call(STATUS_PATH, &[(CREDENTIAL_PARAM, credential)])
            .await
    }

    async fn call(&self, path: &str, params: &[(&str, &str)]) -> crate::Result<ApiResult> {
        let url = self.endpoint_url(path);
        let response = self.http.get(&url, params).await?;

        match ApiResult::from_body(&response.body) {
            Ok(result) => {
                tracing::debug!(
                    "{} -> status={} message={:?}",
                    path,
                    result.status,
                    result.message()
                );
                Ok(result)
            }
            Err(_) if !(200..300).contains(&response.status) => Err(ConsoleError::Http(format!(
                "{} returned status {}",
                path, response.status
            ))),
            Err(e) => Err(e),
        }
    }
}
