use std::fmt::Display;

use error_stack::{Context, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    Validation,
    NotFound,
    Duplicated,
    Conflict,
    Database,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::NotFound => write!(f, "Resource is not found"),
            KernelError::Duplicated => write!(f, "Resource is duplicated"),
            KernelError::Conflict => write!(f, "Conflicting concurrent update"),
            KernelError::Database => write!(f, "Database error"),
        }
    }
}

impl Context for KernelError {}

/// A single failed precondition on one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.field, self.message)
    }
}

/// Folds every collected field error into one validation report.
pub fn validation_report(errors: Vec<FieldError>) -> Report<KernelError> {
    let mut report = Report::new(KernelError::Validation);
    for error in errors {
        report = report.attach_printable(error);
    }
    report
}
