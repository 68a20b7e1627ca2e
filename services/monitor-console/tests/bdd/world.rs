//! BDD test world for the monitor console

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::World;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use monitor_console::io::{HttpClient, HttpResponse};
use monitor_console::notice::{Notice, NoticeSink};
use monitor_console::poller::PollHandle;
use monitor_console::prompt::{CredentialPrompt, PromptReply};
use monitor_console::{Config, Console, ConsoleError};

/// One request as seen by the fake server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl SeenRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
struct FakeServerState {
    admin_password: String,
    config: Value,
    unreachable: bool,
    config_rejection: Option<String>,
    status_rejection: Option<String>,
    requests: Vec<SeenRequest>,
}

impl Default for FakeServerState {
    fn default() -> Self {
        Self {
            admin_password: "admin".to_string(),
            config: json!({
                "monitor": {
                    "token": "tok-1",
                    "types": ["web", "re"],
                    "tasks": [101, 205],
                    "interval_in_ms": 2000
                },
                "notification": {
                    "smtp": {
                        "server": "smtp.example.com",
                        "username": "bot",
                        "password": "mail-pass",
                        "sender_email": "bot@example.com",
                        "receiver_emails": ["a@example.com", "b@example.com"]
                    }
                },
                "server": {"admin_password": "admin"}
            }),
            unreachable: false,
            config_rejection: None,
            status_rejection: None,
            requests: Vec::new(),
        }
    }
}

/// In-memory stand-in for the monitor server's admin API
#[derive(Debug, Default)]
pub struct FakeServer {
    state: Mutex<FakeServerState>,
}

impl FakeServer {
    pub fn set_admin_password(&self, password: &str) {
        let mut state = self.state.lock().unwrap();
        state.admin_password = password.to_string();
        state.config["server"]["admin_password"] = json!(password);
    }

    pub fn set_unreachable(&self) {
        self.state.lock().unwrap().unreachable = true;
    }

    pub fn reject_config_requests(&self, message: &str) {
        self.state.lock().unwrap().config_rejection = Some(message.to_string());
    }

    pub fn reject_status_requests(&self, message: &str) {
        self.state.lock().unwrap().status_rejection = Some(message.to_string());
    }

    pub fn drop_config_section(&self, section: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(config) = state.config.as_object_mut() {
            config.remove(section);
        }
    }

    pub fn admin_password(&self) -> String {
        self.state.lock().unwrap().admin_password.clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<SeenRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn respond(&self, endpoint: &str, params: &[(&str, &str)]) -> Value {
        let mut state = self.state.lock().unwrap();
        state.requests.push(SeenRequest {
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let given = params
            .iter()
            .find(|(key, _)| *key == "admin_password")
            .map(|(_, value)| *value);
        match given {
            None => return json!({"status": "failed", "message": "Permission denied"}),
            Some(given) if given != state.admin_password => {
                return json!({"status": "failed", "message": "Incorrect password"})
            }
            Some(_) => {}
        }

        match endpoint {
            "login" => json!({"status": "success", "message": ""}),
            "get_config" => match &state.config_rejection {
                Some(message) => json!({"status": "failed", "message": message}),
                None => json!({"status": "success", "config": state.config.clone()}),
            },
            "update_config" => {
                if let Some(message) = &state.config_rejection {
                    return json!({"status": "failed", "message": message});
                }
                // Any present value is applied, empty included
                let new_password = params
                    .iter()
                    .find(|(key, _)| *key == "new_admin_password")
                    .map(|(_, value)| value.to_string());
                match new_password {
                    Some(new_password) if new_password != state.admin_password => {
                        state.admin_password = new_password.clone();
                        state.config["server"]["admin_password"] = json!(new_password);
                        json!({"status": "success", "message": "{new_admin_password} 已修改"})
                    }
                    _ => json!({"status": "success", "message": "配置没有改动"}),
                }
            }
            _ => match &state.status_rejection {
                Some(message) => json!({"status": "failed", "message": message}),
                None => json!({"status": "success", "message": ""}),
            },
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeServer {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> monitor_console::Result<HttpResponse> {
        if self.state.lock().unwrap().unreachable {
            return Err(ConsoleError::Http(format!(
                "GET {} failed: connection refused",
                url
            )));
        }
        let endpoint = url.rsplit('/').next().unwrap_or_default();
        let body = self.respond(endpoint, query).to_string();
        Ok(HttpResponse { status: 200, body })
    }
}

/// Replays scripted operator replies, then reports the prompt as closed
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    replies: Mutex<VecDeque<PromptReply>>,
}

impl ScriptedPrompt {
    pub fn push(&self, reply: PromptReply) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait::async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn ask(&self) -> PromptReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PromptReply::Closed)
    }
}

/// Keeps every notice shown to the operator
#[derive(Debug, Default)]
pub struct RecordedNotices {
    notices: Mutex<Vec<Notice>>,
}

impl RecordedNotices {
    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl NoticeSink for RecordedNotices {
    fn show(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default, World)]
pub struct ConsoleWorld {
    pub server: Arc<FakeServer>,
    pub prompt: Arc<ScriptedPrompt>,
    pub notices: Arc<RecordedNotices>,
    pub max_attempts: Option<u32>,
    pub poll_interval_ms: Option<u64>,
    pub cancel: CancellationToken,

    pub console: Option<Console>,
    pub poll_handle: Option<PollHandle>,
    pub start_error: Option<String>,
    pub last_outcome: Option<bool>,
    pub status_count_mark: usize,
}

impl fmt::Debug for ConsoleWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleWorld")
            .field("server", &self.server)
            .field("notices", &self.notices)
            .field("started", &self.console.is_some())
            .field("start_error", &self.start_error)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}

impl Drop for ConsoleWorld {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ConsoleWorld {
    pub fn console(&self) -> &Console {
        self.console.as_ref().expect("console was not started")
    }

    /// Build the console from the scenario's setup and run its start sequence
    pub async fn start_console(&mut self) {
        let mut config = Config::default();
        config.poller.interval_ms = self.poll_interval_ms.unwrap_or(60_000);
        config.login.max_attempts = self.max_attempts;

        let console = Console::new(
            &config,
            self.server.clone(),
            self.prompt.clone(),
            self.notices.clone(),
            self.cancel.clone(),
        );
        match console.start().await {
            Ok(handle) => self.poll_handle = Some(handle),
            Err(e) => self.start_error = Some(e.to_string()),
        }
        self.console = Some(console);
    }

    pub fn status_requests(&self) -> Vec<SeenRequest> {
        self.server.requests_to("update")
    }
}

/// Wait until `condition` holds, failing the step after two seconds
pub async fn eventually(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {}",
            what
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
