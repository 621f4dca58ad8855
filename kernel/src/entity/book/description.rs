use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookDescription(String);

impl BookDescription {
    pub const MAX_LENGTH: usize = 1024;

    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}
