use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }
}
