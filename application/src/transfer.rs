mod book;
mod role;
mod user;

pub use self::{book::*, role::*, user::*};

use error_stack::Report;

use kernel::interface::search::{SearchSpec, SortOrder};
use kernel::{validation_report, FieldError, KernelError};

pub(crate) fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.chars().count();
    if length < min || length > max {
        errors.push(FieldError::new(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
}

/// Raw search parameters as a client would send them. Everything arrives
/// as text and is checked here before it reaches [`SearchSpec`].
#[derive(Debug, Clone)]
pub struct SearchDto {
    pub search: String,
    pub page: String,
    pub size: String,
    pub sort: String,
    pub order: String,
}

impl Default for SearchDto {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: "1".to_string(),
            size: "10".to_string(),
            sort: "id".to_string(),
            order: "desc".to_string(),
        }
    }
}

impl SearchDto {
    pub fn validate(self) -> error_stack::Result<SearchSpec, KernelError> {
        let mut errors = Vec::new();

        let order = match self.order.as_str() {
            "desc" => SortOrder::Desc,
            "asc" => SortOrder::Asc,
            other => {
                errors.push(FieldError::new(
                    "order",
                    format!("can not be ordered by {other}, the correct values = [desc, asc]"),
                ));
                SortOrder::Desc
            }
        };
        let page = self.page.parse::<i64>().unwrap_or_else(|_| {
            errors.push(FieldError::new(
                "page",
                format!("page = {} is not a number", self.page),
            ));
            0
        });
        let size = self.size.parse::<i64>().unwrap_or_else(|_| {
            errors.push(FieldError::new(
                "size",
                format!("size = {} is not a number", self.size),
            ));
            0
        });

        if !errors.is_empty() {
            return Err(validation_report(errors));
        }
        Ok(SearchSpec::new(self.search, self.sort, order, page, size))
    }
}

pub(crate) fn positive(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: i64,
) {
    if value <= 0 {
        errors.push(FieldError::new(
            field,
            format!("{value} must be a positive integer"),
        ));
    }
}

pub(crate) fn report_unless_empty(errors: Vec<FieldError>) -> Result<(), Report<KernelError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_report(errors))
    }
}

// Update forms send "" for fields the caller left untouched.
pub(crate) fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

pub(crate) fn provided(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
