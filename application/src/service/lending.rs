use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::store::{DependOnBookStore, DependOnUserStore, ResourceStore};
use kernel::prelude::entity::{Book, BookStatus, HoldSet, User};
use kernel::KernelError;

use crate::service::not_found;
use crate::transfer::{BookDto, HoldBookDto, UserDto};

/// Upper bound on optimistic retries. A user's revision can only advance
/// [`HoldSet::LIMIT`] times while races over capacity are still possible,
/// so any bound above the limit settles every contender.
const HOLD_RETRY_ATTEMPTS: usize = 5;

/// Lending workflow: attach a book to a user's hold set and release it again.
///
/// Both operations reload the user inside a fresh transaction on every
/// attempt and rely on the store's revision check to reject stale writes.
#[async_trait::async_trait]
pub trait LendingService<Connection>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnUserStore<Connection>
    + DependOnBookStore<Connection>
where
    Connection: Transaction + Send,
{
    async fn hold(&self, dto: HoldBookDto) -> error_stack::Result<(UserDto, BookDto), KernelError> {
        let (user_id, book_id) = dto.validate()?;

        for attempt in 0..HOLD_RETRY_ATTEMPTS {
            let mut con = self.database_connection().transact().await?;

            let book = self
                .book_store()
                .find_by_id(&mut con, &book_id)
                .await?
                .filter(|book| *book.status() != BookStatus::Deleted)
                .ok_or_else(|| not_found::<Book>(&book_id))?;
            let mut user = self
                .user_store()
                .find_by_id(&mut con, &user_id)
                .await?
                .ok_or_else(|| not_found::<User>(&user_id))?;

            if user.holds().contains(&book_id) {
                return Err(Report::new(KernelError::Validation).attach_printable(format!(
                    "book id = {} is already held by user id = {}",
                    book_id.as_ref(),
                    user_id.as_ref()
                )));
            }
            if user.holds().is_full() {
                return Err(Report::new(KernelError::Validation).attach_printable(format!(
                    "user id = {} already holds {} books",
                    user_id.as_ref(),
                    HoldSet::LIMIT
                )));
            }

            user.hold(book_id);
            match self.user_store().update(&mut con, &user).await {
                Ok(()) => {
                    con.commit().await?;
                    tracing::info!(
                        user = *user_id.as_ref(),
                        book = *book_id.as_ref(),
                        "held"
                    );
                    return Ok((UserDto::from(user), BookDto::from(book)));
                }
                Err(report) if matches!(report.current_context(), KernelError::Conflict) => {
                    tracing::debug!(
                        user = *user_id.as_ref(),
                        attempt,
                        "hold raced with another writer, retrying"
                    );
                    con.roll_back().await?;
                }
                Err(report) => return Err(report),
            }
        }

        Err(Report::new(KernelError::Database).attach_printable(format!(
            "user id = {} kept conflicting after {HOLD_RETRY_ATTEMPTS} attempts",
            user_id.as_ref()
        )))
    }

    async fn unhold(
        &self,
        dto: HoldBookDto,
    ) -> error_stack::Result<(UserDto, BookDto), KernelError> {
        let (user_id, book_id) = dto.validate()?;

        for attempt in 0..HOLD_RETRY_ATTEMPTS {
            let mut con = self.database_connection().transact().await?;

            // A book marked deleted can still be returned.
            let book = self
                .book_store()
                .find_by_id(&mut con, &book_id)
                .await?
                .ok_or_else(|| not_found::<Book>(&book_id))?;
            let mut user = self
                .user_store()
                .find_by_id(&mut con, &user_id)
                .await?
                .ok_or_else(|| not_found::<User>(&user_id))?;

            if !user.holds().contains(&book_id) {
                return Err(Report::new(KernelError::Validation).attach_printable(format!(
                    "book id = {} is not held by user id = {}",
                    book_id.as_ref(),
                    user_id.as_ref()
                )));
            }

            user.release(&book_id);
            match self.user_store().update(&mut con, &user).await {
                Ok(()) => {
                    con.commit().await?;
                    tracing::info!(
                        user = *user_id.as_ref(),
                        book = *book_id.as_ref(),
                        "released"
                    );
                    return Ok((UserDto::from(user), BookDto::from(book)));
                }
                Err(report) if matches!(report.current_context(), KernelError::Conflict) => {
                    tracing::debug!(
                        user = *user_id.as_ref(),
                        attempt,
                        "release raced with another writer, retrying"
                    );
                    con.roll_back().await?;
                }
                Err(report) => return Err(report),
            }
        }

        Err(Report::new(KernelError::Database).attach_printable(format!(
            "user id = {} kept conflicting after {HOLD_RETRY_ATTEMPTS} attempts",
            user_id.as_ref()
        )))
    }
}

impl<Connection, T> LendingService<Connection> for T
where
    Connection: Transaction + Send,
    T: DependOnDatabaseConnection<Connection>
        + DependOnUserStore<Connection>
        + DependOnBookStore<Connection>,
{
}
