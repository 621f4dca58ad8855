mod revision;

pub use self::revision::*;
