use std::str::FromStr;

use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookCode, BookDescription, BookDraft, BookId, BookPatch,
    BookStatus, BookTitle, UserId,
};
use kernel::{validation_report, FieldError, KernelError};

use crate::transfer::{check_length, given, positive, provided, report_unless_empty};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDto {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub status: String,
    pub description: Option<String>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        let book = book.into_destruct();
        Self {
            id: book.id.into(),
            code: book.code.into(),
            title: book.title.into(),
            author: book.author.into(),
            category: book.category.as_str().to_string(),
            status: book.status.as_str().to_string(),
            description: book.description.map(Into::into),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub code: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: Option<String>,
}

impl CreateBookDto {
    pub fn validate(self) -> error_stack::Result<BookDraft, KernelError> {
        let mut errors = Vec::new();

        check_length(&mut errors, "code", &self.code, 1, BookCode::MAX_LENGTH);
        check_length(&mut errors, "title", &self.title, 1, BookTitle::MAX_LENGTH);
        check_length(&mut errors, "author", &self.author, 1, BookAuthor::MAX_LENGTH);
        if let Some(description) = &self.description {
            check_length(
                &mut errors,
                "description",
                description,
                0,
                BookDescription::MAX_LENGTH,
            );
        }
        let category = match BookCategory::from_str(&self.category) {
            Ok(category) => Some(category),
            Err(_) => {
                errors.push(FieldError::new(
                    "category",
                    format!(
                        "{} is not one of [NOVEL, STUDY, COMICS]",
                        self.category
                    ),
                ));
                None
            }
        };

        match (category, errors.is_empty()) {
            (Some(category), true) => Ok(BookDraft {
                code: BookCode::new(self.code),
                title: BookTitle::new(self.title),
                author: BookAuthor::new(self.author),
                category,
                status: BookStatus::default(),
                description: self.description.map(BookDescription::new),
            }),
            _ => Err(validation_report(errors)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBookDto {
    pub code: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl UpdateBookDto {
    pub fn validate(self) -> error_stack::Result<BookPatch, KernelError> {
        let mut errors = Vec::new();

        if let Some(code) = given(&self.code) {
            check_length(&mut errors, "code", code, 1, BookCode::MAX_LENGTH);
        }
        if let Some(title) = given(&self.title) {
            check_length(&mut errors, "title", title, 1, BookTitle::MAX_LENGTH);
        }
        if let Some(author) = given(&self.author) {
            check_length(&mut errors, "author", author, 1, BookAuthor::MAX_LENGTH);
        }
        if let Some(description) = given(&self.description) {
            check_length(
                &mut errors,
                "description",
                description,
                0,
                BookDescription::MAX_LENGTH,
            );
        }
        let category = match given(&self.category) {
            Some(raw) => match BookCategory::from_str(raw) {
                Ok(category) => Some(category),
                Err(_) => {
                    errors.push(FieldError::new(
                        "category",
                        format!("{raw} is not one of [NOVEL, STUDY, COMICS]"),
                    ));
                    None
                }
            },
            None => None,
        };
        report_unless_empty(errors)?;

        Ok(BookPatch {
            code: provided(self.code).map(BookCode::new),
            title: provided(self.title).map(BookTitle::new),
            author: provided(self.author).map(BookAuthor::new),
            category,
            description: provided(self.description).map(BookDescription::new),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HoldBookDto {
    pub user_id: i64,
    pub book_id: i64,
}

impl HoldBookDto {
    pub fn validate(self) -> error_stack::Result<(UserId, BookId), KernelError> {
        let mut errors = Vec::new();
        positive(&mut errors, "user_id", self.user_id);
        positive(&mut errors, "book_id", self.book_id);
        report_unless_empty(errors)?;
        Ok((UserId::new(self.user_id), BookId::new(self.book_id)))
    }
}
