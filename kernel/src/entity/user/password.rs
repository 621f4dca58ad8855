use std::fmt::{self, Debug, Formatter};

use vodca::{AsRefln, Fromln};

/// An already-hashed password. The clear text never reaches the kernel.
#[derive(Clone, PartialEq, Eq, Fromln, AsRefln)]
pub struct PasswordHash(String);

impl PasswordHash {
    // Bounds apply to the clear text, before hashing.
    pub const MIN_RAW_LENGTH: usize = 3;
    pub const MAX_RAW_LENGTH: usize = 10;

    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
