use std::fmt::Display;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookStatus {
    #[default]
    Good,
    Old,
    Deleted,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Good => "GOOD",
            BookStatus::Old => "OLD",
            BookStatus::Deleted => "DELETED",
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = Report<KernelError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GOOD" => Ok(BookStatus::Good),
            "OLD" => Ok(BookStatus::Old),
            "DELETED" => Ok(BookStatus::Deleted),
            _ => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("unknown book status = {value}"))),
        }
    }
}
