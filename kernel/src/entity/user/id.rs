use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Fromln,
    AsRefln,
)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
