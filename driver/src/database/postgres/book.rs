use std::str::FromStr;

use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::search::{SearchPolicy, SearchQuery};
use kernel::interface::store::ResourceStore;
use kernel::prelude::entity::{
    Book, BookAuthor, BookCategory, BookCode, BookDescription, BookDraft, BookId, BookStatus,
    BookTitle,
};
use kernel::KernelError;

use crate::database::postgres::{keyword_clause, keyword_pattern, PostgresTransaction};
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresBookStore;

#[async_trait::async_trait]
impl ResourceStore<PostgresTransaction> for PostgresBookStore {
    type Resource = Book;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con.connection(), id).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Book>, i64), KernelError> {
        PgBookInternal::find_page(con.connection(), query).await
    }

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        draft: BookDraft,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con.connection(), draft).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con.connection(), book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con.connection(), id).await
    }

    async fn exists_by_unique_field(
        &self,
        con: &mut PostgresTransaction,
        code: &str,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::exists_by_code(con.connection(), code).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    code: String,
    title: String,
    author: String,
    category: String,
    status: String,
    description: Option<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = Report<KernelError>;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Book::new(
            BookId::new(row.id),
            BookCode::new(row.code),
            BookTitle::new(row.title),
            BookAuthor::new(row.author),
            BookCategory::from_str(&row.category)?,
            BookStatus::from_str(&row.status)?,
            row.description.map(BookDescription::new),
        ))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, code, title, author, category, status, description
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn find_page(
        con: &mut PgConnection,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Book>, i64), KernelError> {
        let filter = keyword_clause(Book::SEARCHABLE_COLUMNS);
        let pattern = keyword_pattern(query.keyword());

        let statement = format!(
            // language=postgresql
            r#"
            SELECT id, code, title, author, category, status, description
            FROM books
            WHERE {filter}
            ORDER BY {sort} {order}
            OFFSET $2 LIMIT $3
            "#,
            sort = query.sort_column(),
            order = query.order().as_sql(),
        );
        let rows = sqlx::query_as::<_, BookRow>(&statement)
            .bind(pattern.as_deref())
            .bind(query.offset())
            .bind(query.limit())
            .fetch_all(&mut *con)
            .await
            .convert_error()?;
        let books = rows
            .into_iter()
            .map(Book::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let count_statement = format!(
            // language=postgresql
            "SELECT COUNT(*) FROM books WHERE {filter}"
        );
        let total: i64 = sqlx::query_scalar(&count_statement)
            .bind(pattern.as_deref())
            .fetch_one(con)
            .await
            .convert_error()?;

        Ok((books, total))
    }

    async fn create(
        con: &mut PgConnection,
        draft: BookDraft,
    ) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (code, title, author, category, status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, code, title, author, category, status, description
            "#,
        )
        .bind(draft.code.as_ref())
        .bind(draft.title.as_ref())
        .bind(draft.author.as_ref())
        .bind(draft.category.as_str())
        .bind(draft.status.as_str())
        .bind(draft.description.as_ref().map(|description| description.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Book::try_from(row)
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE books
            SET code = $2, title = $3, author = $4, category = $5, status = $6, description = $7
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.code().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.category().as_str())
        .bind(book.status().as_str())
        .bind(book.description().as_ref().map(|description| description.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn exists_by_code(
        con: &mut PgConnection,
        code: &str,
    ) -> error_stack::Result<bool, KernelError> {
        let exists: bool = sqlx::query_scalar(
            // language=postgresql
            r#"
            SELECT EXISTS (
                SELECT 1 FROM books
                WHERE code = $1 AND status <> 'DELETED'
            )
            "#,
        )
        .bind(code)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(exists)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::search::{SearchPolicy, SearchSpec, SortOrder};
    use kernel::interface::store::{Resource, ResourceStore};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookCategory, BookCode, BookDraft, BookPatch, BookStatus, BookTitle,
    };
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookStore, PostgresDatabase};

    fn draft(code: &str) -> BookDraft {
        BookDraft {
            code: BookCode::new(code),
            title: BookTitle::new("test"),
            author: BookAuthor::new("tester"),
            category: BookCategory::Study,
            status: BookStatus::Good,
            description: None,
        }
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let code = format!("T-{}", rand::random::<u32>());

        let book = PostgresBookStore.create(&mut con, draft(&code)).await?;
        let id = book.id().clone();

        let found = PostgresBookStore.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        assert!(PostgresBookStore.exists_by_unique_field(&mut con, &code).await?);

        let mut book = book;
        book.apply(BookPatch {
            title: Some(BookTitle::new("test2")),
            ..BookPatch::default()
        });
        PostgresBookStore.update(&mut con, &book).await?;
        let found = PostgresBookStore.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book));

        PostgresBookStore.delete(&mut con, &id).await?;
        let found = PostgresBookStore.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn search() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let code = format!("T-{}", rand::random::<u32>());

        let book = PostgresBookStore.create(&mut con, draft(&code)).await?;

        let spec = SearchSpec::new("tester", "id", SortOrder::Desc, 1, 10);
        let query = Book::build_query(&spec)?;
        let (books, total) = PostgresBookStore.find_page(&mut con, &query).await?;
        assert!(total >= 1);
        assert!(books.iter().any(|found| found.id() == book.id()));

        con.roll_back().await?;
        Ok(())
    }
}
