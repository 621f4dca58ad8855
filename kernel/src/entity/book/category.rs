use std::fmt::Display;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookCategory {
    Novel,
    Study,
    Comics,
}

impl BookCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Novel => "NOVEL",
            BookCategory::Study => "STUDY",
            BookCategory::Comics => "COMICS",
        }
    }
}

impl Display for BookCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookCategory {
    type Err = Report<KernelError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NOVEL" => Ok(BookCategory::Novel),
            "STUDY" => Ok(BookCategory::Study),
            "COMICS" => Ok(BookCategory::Comics),
            _ => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("unknown book category = {value}"))),
        }
    }
}
