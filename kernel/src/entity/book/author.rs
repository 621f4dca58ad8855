use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookAuthor(String);

impl BookAuthor {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into())
    }
}
