mod author;
mod category;
mod code;
mod description;
mod id;
mod status;
mod title;

pub use self::{author::*, category::*, code::*, description::*, id::*, status::*, title::*};

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::search::SearchPolicy;
use crate::store::{DeleteMode, Resource};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    code: BookCode,
    title: BookTitle,
    author: BookAuthor,
    category: BookCategory,
    status: BookStatus,
    description: Option<BookDescription>,
}

impl Book {
    pub fn new(
        id: BookId,
        code: BookCode,
        title: BookTitle,
        author: BookAuthor,
        category: BookCategory,
        status: BookStatus,
        description: Option<BookDescription>,
    ) -> Self {
        Self {
            id,
            code,
            title,
            author,
            category,
            status,
            description,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDraft {
    pub code: BookCode,
    pub title: BookTitle,
    pub author: BookAuthor,
    pub category: BookCategory,
    pub status: BookStatus,
    pub description: Option<BookDescription>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct BookPatch {
    pub code: Option<BookCode>,
    pub title: Option<BookTitle>,
    pub author: Option<BookAuthor>,
    pub category: Option<BookCategory>,
    pub description: Option<BookDescription>,
}

impl Resource for Book {
    type Id = BookId;
    type Draft = BookDraft;
    type Patch = BookPatch;

    const KIND: &'static str = "book";

    fn id(&self) -> &BookId {
        &self.id
    }

    fn id_from(id: i64) -> BookId {
        BookId::new(id)
    }

    fn apply(&mut self, patch: BookPatch) {
        self.substitute(|book| {
            if let Some(code) = patch.code {
                *book.code = code;
            }
            if let Some(title) = patch.title {
                *book.title = title;
            }
            if let Some(author) = patch.author {
                *book.author = author;
            }
            if let Some(category) = patch.category {
                *book.category = category;
            }
            if let Some(description) = patch.description {
                *book.description = Some(description);
            }
        });
    }

    // Books keep their row for referential history.
    fn delete_mode(mut self) -> DeleteMode<Self> {
        self.substitute(|book| {
            *book.status = BookStatus::Deleted;
        });
        DeleteMode::Soft(self)
    }
}

impl SearchPolicy for Book {
    const SORTABLE_COLUMNS: &'static [&'static str] =
        &["id", "code", "title", "author", "category", "description"];
    const SEARCHABLE_COLUMNS: &'static [&'static str] =
        &["category", "title", "author", "description"];
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::{Book, BookAuthor, BookCategory, BookCode, BookId, BookPatch, BookStatus, BookTitle};
    use crate::store::{DeleteMode, Resource};

    fn book() -> Book {
        Book::new(
            BookId::new(1),
            BookCode::new("B-001"),
            BookTitle::new("Study Guide"),
            BookAuthor::new("Someone"),
            BookCategory::Study,
            BookStatus::Good,
            None,
        )
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut book = book();
        book.apply(BookPatch {
            title: Some(BookTitle::new("Second Edition")),
            ..BookPatch::default()
        });
        assert_eq!(book.title(), &BookTitle::new("Second Edition"));
        assert_eq!(book.code(), &BookCode::new("B-001"));
        assert_eq!(*book.category(), BookCategory::Study);
    }

    #[test]
    fn apply_is_idempotent() {
        let patch = BookPatch {
            author: Some(BookAuthor::new("Somebody Else")),
            ..BookPatch::default()
        };
        let mut once = book();
        once.apply(patch.clone());
        let mut twice = once.clone();
        twice.apply(patch);
        assert_eq!(once, twice);
    }

    #[test]
    fn delete_marks_instead_of_removing() {
        match book().delete_mode() {
            DeleteMode::Soft(marked) => assert_eq!(*marked.status(), BookStatus::Deleted),
            DeleteMode::Hard => panic!("books must be soft-deleted"),
        }
    }

    #[test]
    fn category_and_status_parse_their_wire_names() {
        assert_eq!(BookCategory::from_str("COMICS").unwrap(), BookCategory::Comics);
        assert!(BookCategory::from_str("POETRY").is_err());
        assert_eq!(BookStatus::from_str("OLD").unwrap(), BookStatus::Old);
        assert_eq!(BookStatus::default(), BookStatus::Good);
    }
}
