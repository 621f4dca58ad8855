use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct StudentId(String);

impl StudentId {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 10;

    pub fn new(student_id: impl Into<String>) -> Self {
        Self(student_id.into())
    }
}
