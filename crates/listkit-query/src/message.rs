//! One-line notices shown above a list: empty-state hints and the toast
//! that follows a bulk run.

use std::fmt;

use serde::Serialize;

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageLevel {
    fn as_str(self) -> &'static str {
        match self {
            MessageLevel::Info => "info",
            MessageLevel::Success => "success",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        }
    }
}

/// A notice attached to a [`ViewResult`](crate::ViewResult) or produced by
/// a bulk summary. Renders as `[level] text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

macro_rules! level_ctor {
    ($name:ident, $level:ident) => {
        pub fn $name(text: impl Into<String>) -> Self {
            Message {
                level: MessageLevel::$level,
                text: text.into(),
            }
        }
    };
}

impl Message {
    level_ctor!(info, Info);
    level_ctor!(success, Success);
    level_ctor!(warning, Warning);
    level_ctor!(error, Error);
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.text)
    }
}
