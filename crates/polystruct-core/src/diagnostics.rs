//! Diagnostics reported by a generation pass instead of failing it.

use std::fmt;

use crate::error::GeneratorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One reportable condition from a generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Interface being generated when the condition occurred.
    pub interface: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(interface: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            interface: interface.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn error(interface: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            interface: interface.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<GeneratorError> for Diagnostic {
    fn from(err: GeneratorError) -> Self {
        let interface = match &err {
            GeneratorError::InvalidName { interface, .. }
            | GeneratorError::UnsupportedInterface { interface, .. }
            | GeneratorError::UnsupportedMember { interface, .. } => Some(interface.clone()),
            _ => None,
        };
        Self {
            severity: Severity::Error,
            interface,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.interface {
            Some(interface) => write!(f, "{} [{}]: {}", level, interface, self.message),
            None => write!(f, "{}: {}", level, self.message),
        }
    }
}
