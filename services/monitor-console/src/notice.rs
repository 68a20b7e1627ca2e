//! Operator-facing notices

use std::fmt;

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short transient message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.text),
            NoticeLevel::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// Trait for surfacing notices to the operator
pub trait NoticeSink: Send + Sync + fmt::Debug {
    fn show(&self, notice: Notice);
}

/// Prints notices on stderr so they do not interleave with command output
#[derive(Debug, Default)]
pub struct TerminalNotices;

impl NoticeSink for TerminalNotices {
    fn show(&self, notice: Notice) {
        tracing::debug!("Notice: {:?}", notice);
        eprintln!("{}", notice);
    }
}
