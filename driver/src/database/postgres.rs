use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::store::{
    DependOnBookStore, DependOnResourceStore, DependOnRoleStore, DependOnUserStore,
};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{book::*, role::*, user::*};

mod book;
mod role;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    books: PostgresBookStore,
    users: PostgresUserStore,
    roles: PostgresRoleStore,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url).await.convert_error()?;
        Ok(Self {
            pool,
            books: PostgresBookStore,
            users: PostgresUserStore,
            roles: PostgresRoleStore,
        })
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl PostgresTransaction {
    pub(in crate::database) fn connection(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<PostgresTransaction> for PostgresDatabase {
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

impl DependOnResourceStore<PostgresTransaction, PostgresBookStore> for PostgresDatabase {
    fn resource_store(&self) -> &PostgresBookStore {
        &self.books
    }
}

impl DependOnResourceStore<PostgresTransaction, PostgresUserStore> for PostgresDatabase {
    fn resource_store(&self) -> &PostgresUserStore {
        &self.users
    }
}

impl DependOnResourceStore<PostgresTransaction, PostgresRoleStore> for PostgresDatabase {
    fn resource_store(&self) -> &PostgresRoleStore {
        &self.roles
    }
}

impl DependOnBookStore<PostgresTransaction> for PostgresDatabase {
    type BookStore = PostgresBookStore;
    fn book_store(&self) -> &PostgresBookStore {
        &self.books
    }
}

impl DependOnUserStore<PostgresTransaction> for PostgresDatabase {
    type UserStore = PostgresUserStore;
    fn user_store(&self) -> &PostgresUserStore {
        &self.users
    }
}

impl DependOnRoleStore<PostgresTransaction> for PostgresDatabase {
    type RoleStore = PostgresRoleStore;
    fn role_store(&self) -> &PostgresRoleStore {
        &self.roles
    }
}

/// `$1` must be bound to the lowered `%keyword%` pattern, or NULL to
/// match everything.
pub(in crate::database) fn keyword_clause(columns: &[&str]) -> String {
    let filters = columns
        .iter()
        .map(|column| format!("lower({column}) LIKE $1"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("($1::text IS NULL OR {filters})")
}

pub(in crate::database) fn keyword_pattern(keyword: &Option<String>) -> Option<String> {
    keyword.as_ref().map(|keyword| format!("%{keyword}%"))
}
