use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RoleName(String);

impl RoleName {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 10;

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
