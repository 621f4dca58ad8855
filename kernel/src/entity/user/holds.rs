use std::collections::BTreeSet;

use crate::entity::BookId;

/// The books a user currently holds. A set by construction: the same
/// book can never appear twice, and the size never exceeds [`Self::LIMIT`]
/// as long as callers check [`Self::is_full`] before inserting.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HoldSet(BTreeSet<BookId>);

impl HoldSet {
    /// One user may hold at most this many books at a time.
    pub const LIMIT: usize = 3;

    pub fn new(books: impl IntoIterator<Item = BookId>) -> Self {
        Self(books.into_iter().collect())
    }

    pub fn contains(&self, book_id: &BookId) -> bool {
        self.0.contains(book_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= Self::LIMIT
    }

    /// Returns `false` when the book is already held.
    pub fn insert(&mut self, book_id: BookId) -> bool {
        self.0.insert(book_id)
    }

    /// Returns `false` when the book was not held.
    pub fn remove(&mut self, book_id: &BookId) -> bool {
        self.0.remove(book_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookId> {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::HoldSet;
    use crate::entity::BookId;

    #[test]
    fn duplicates_are_refused() {
        let mut holds = HoldSet::default();
        assert!(holds.insert(BookId::new(1)));
        assert!(!holds.insert(BookId::new(1)));
        assert_eq!(holds.len(), 1);
    }

    #[test]
    fn full_at_the_limit() {
        let holds = HoldSet::new((1..=3).map(BookId::new));
        assert!(holds.is_full());
        assert!(!HoldSet::new((1..=2).map(BookId::new)).is_full());
    }

    #[test]
    fn remove_reports_missing_entries() {
        let mut holds = HoldSet::new([BookId::new(7)]);
        assert!(holds.remove(&BookId::new(7)));
        assert!(!holds.remove(&BookId::new(7)));
        assert!(holds.is_empty());
    }
}
