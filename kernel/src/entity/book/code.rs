use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookCode(String);

impl BookCode {
    pub const MAX_LENGTH: usize = 32;

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}
