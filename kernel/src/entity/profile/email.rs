use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Unique per profile; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}
