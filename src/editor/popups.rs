use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupContent {
    Error { message: String, code: Option<i64> },
    Info { summary: String },
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupContent::Error {
                message,
                code: Some(code),
            } => write!(f, "{} (code {})", message, code),
            PopupContent::Error { message, code: None } => write!(f, "{}", message),
            PopupContent::Info { summary } => write!(f, "{}", summary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub key: Option<String>,
    pub content: PopupContent,
    pub created_at: DateTime<Utc>,
}

impl Popup {
    pub fn is_error(&self) -> bool {
        matches!(self.content, PopupContent::Error { .. })
    }
}

/// Transient user-facing notifications.
///
/// A keyed popup replaces an earlier one with the same key, so repeating the
/// same mistake does not stack identical warnings.
#[derive(Debug, Clone, Default)]
pub struct PopupQueue {
    popups: Vec<Popup>,
}

impl PopupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, content: PopupContent, key: Option<&str>) {
        if let Some(key) = key {
            self.popups.retain(|p| p.key.as_deref() != Some(key));
        }
        self.popups.push(Popup {
            key: key.map(str::to_string),
            content,
            created_at: Utc::now(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>, code: Option<i64>, key: Option<&str>) {
        self.push(
            PopupContent::Error {
                message: message.into(),
                code,
            },
            key,
        );
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Popup> {
        std::mem::take(&mut self.popups)
    }
}
