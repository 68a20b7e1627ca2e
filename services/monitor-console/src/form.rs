//! Editable copy of the remote monitor and notification configuration

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::ConsoleError;

/// Settings for the recruit monitor itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    pub token: String,
    pub types: String,
    pub tasks: String,
    pub interval_ms: String,
}

/// SMTP settings used by the server to send notification mail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    pub smtp_server: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_sender_email: String,
    pub smtp_receiver_emails: String,
}

/// Every field the operator can edit.
///
/// `admin_password` is pre-filled with the server's current password and is
/// submitted as the new one; leaving it empty requests no change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub monitor: MonitorConfig,
    pub notification: NotificationConfig,
    pub admin_password: String,
}

/// A single editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    MonitorToken,
    MonitorTypes,
    MonitorTasks,
    MonitorIntervalMs,
    SmtpServer,
    SmtpUsername,
    SmtpPassword,
    SmtpSenderEmail,
    SmtpReceiverEmails,
    AdminPassword,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::MonitorToken,
        FormField::MonitorTypes,
        FormField::MonitorTasks,
        FormField::MonitorIntervalMs,
        FormField::SmtpServer,
        FormField::SmtpUsername,
        FormField::SmtpPassword,
        FormField::SmtpSenderEmail,
        FormField::SmtpReceiverEmails,
        FormField::AdminPassword,
    ];

    /// Name used on the command line
    pub fn id(self) -> &'static str {
        match self {
            FormField::MonitorToken => "monitor-token",
            FormField::MonitorTypes => "monitor-types",
            FormField::MonitorTasks => "monitor-tasks",
            FormField::MonitorIntervalMs => "monitor-interval-in-ms",
            FormField::SmtpServer => "notification-smtp-server",
            FormField::SmtpUsername => "notification-smtp-username",
            FormField::SmtpPassword => "notification-smtp-password",
            FormField::SmtpSenderEmail => "notification-smtp-sender-email",
            FormField::SmtpReceiverEmails => "notification-smtp-receiver-emails",
            FormField::AdminPassword => "admin-password",
        }
    }

    /// Query parameter name on `update_config`
    pub fn param(self) -> &'static str {
        match self {
            FormField::MonitorToken => "monitor_token",
            FormField::MonitorTypes => "monitor_types",
            FormField::MonitorTasks => "monitor_tasks",
            FormField::MonitorIntervalMs => "monitor_interval_in_ms",
            FormField::SmtpServer => "notification_smtp_server",
            FormField::SmtpUsername => "notification_smtp_username",
            FormField::SmtpPassword => "notification_smtp_password",
            FormField::SmtpSenderEmail => "notification_smtp_sender_email",
            FormField::SmtpReceiverEmails => "notification_smtp_receiver_emails",
            FormField::AdminPassword => "new_admin_password",
        }
    }

    /// JSON pointer into the `config` document of `get_config`
    pub fn pointer(self) -> &'static str {
        match self {
            FormField::MonitorToken => "/monitor/token",
            FormField::MonitorTypes => "/monitor/types",
            FormField::MonitorTasks => "/monitor/tasks",
            FormField::MonitorIntervalMs => "/monitor/interval_in_ms",
            FormField::SmtpServer => "/notification/smtp/server",
            FormField::SmtpUsername => "/notification/smtp/username",
            FormField::SmtpPassword => "/notification/smtp/password",
            FormField::SmtpSenderEmail => "/notification/smtp/sender_email",
            FormField::SmtpReceiverEmails => "/notification/smtp/receiver_emails",
            FormField::AdminPassword => "/server/admin_password",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, FormField::SmtpPassword | FormField::AdminPassword)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FormField {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.id() == s)
            .ok_or_else(|| ConsoleError::Command(format!("no field named '{}'", s)))
    }
}

impl ConfigForm {
    /// Decode the `config` document returned by `get_config`.
    ///
    /// Every field must be present; nothing is returned for a partial document.
    pub fn from_payload(config: &Value) -> crate::Result<Self> {
        let mut form = ConfigForm::default();
        for field in FormField::ALL {
            let value = config.pointer(field.pointer()).ok_or_else(|| {
                ConsoleError::Payload(format!("config is missing {}", field.pointer()))
            })?;
            form.set(field, form_value(value));
        }
        Ok(form)
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::MonitorToken => &self.monitor.token,
            FormField::MonitorTypes => &self.monitor.types,
            FormField::MonitorTasks => &self.monitor.tasks,
            FormField::MonitorIntervalMs => &self.monitor.interval_ms,
            FormField::SmtpServer => &self.notification.smtp_server,
            FormField::SmtpUsername => &self.notification.smtp_username,
            FormField::SmtpPassword => &self.notification.smtp_password,
            FormField::SmtpSenderEmail => &self.notification.smtp_sender_email,
            FormField::SmtpReceiverEmails => &self.notification.smtp_receiver_emails,
            FormField::AdminPassword => &self.admin_password,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::MonitorToken => &mut self.monitor.token,
            FormField::MonitorTypes => &mut self.monitor.types,
            FormField::MonitorTasks => &mut self.monitor.tasks,
            FormField::MonitorIntervalMs => &mut self.monitor.interval_ms,
            FormField::SmtpServer => &mut self.notification.smtp_server,
            FormField::SmtpUsername => &mut self.notification.smtp_username,
            FormField::SmtpPassword => &mut self.notification.smtp_password,
            FormField::SmtpSenderEmail => &mut self.notification.smtp_sender_email,
            FormField::SmtpReceiverEmails => &mut self.notification.smtp_receiver_emails,
            FormField::AdminPassword => &mut self.admin_password,
        };
        *slot = value.into();
    }

    /// New administrator password requested by this form, if any
    pub fn new_admin_password(&self) -> Option<&str> {
        Some(self.admin_password.as_str()).filter(|p| !p.is_empty())
    }

    /// Query parameters for `update_config`, excluding the session credential.
    ///
    /// Every field is sent except an empty admin password. The server applies
    /// `new_admin_password` whenever it is present, even when empty.
    pub fn update_params(&self) -> Vec<(&'static str, &str)> {
        FormField::ALL
            .into_iter()
            .filter(|field| {
                *field != FormField::AdminPassword || self.new_admin_password().is_some()
            })
            .map(|field| (field.param(), self.get(field)))
            .collect()
    }
}

/// Render a configuration value the way it appears in an input field:
/// strings verbatim, numbers in decimal, arrays comma-joined, null as empty.
pub fn form_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(form_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}
