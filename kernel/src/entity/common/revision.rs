use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

// Optimistic-lock counter. The store bumps it on every successful write;
// a stale value at write time means somebody else got there first.
pub struct Revision<T>(i64, PhantomData<T>);

impl<T> Revision<T> {
    pub fn new(revision: impl Into<i64>) -> Self {
        Self(revision.into(), PhantomData)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1, PhantomData)
    }
}

impl<T> Debug for Revision<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({})", self.0)
    }
}

impl<T> Clone for Revision<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Revision<T> {}

impl<T> PartialEq for Revision<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Revision<T> {}

impl<T> From<i64> for Revision<T> {
    fn from(revision: i64) -> Self {
        Self(revision, PhantomData)
    }
}

impl<T> AsRef<i64> for Revision<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}
