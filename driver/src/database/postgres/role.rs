use sqlx::PgConnection;

use kernel::interface::search::{SearchPolicy, SearchQuery};
use kernel::interface::store::ResourceStore;
use kernel::prelude::entity::{Role, RoleDraft, RoleId, RoleName};
use kernel::KernelError;

use crate::database::postgres::{keyword_clause, keyword_pattern, PostgresTransaction};
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresRoleStore;

#[async_trait::async_trait]
impl ResourceStore<PostgresTransaction> for PostgresRoleStore {
    type Resource = Role;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &RoleId,
    ) -> error_stack::Result<Option<Role>, KernelError> {
        PgRoleInternal::find_by_id(con.connection(), id).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Role>, i64), KernelError> {
        PgRoleInternal::find_page(con.connection(), query).await
    }

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        draft: RoleDraft,
    ) -> error_stack::Result<Role, KernelError> {
        PgRoleInternal::create(con.connection(), draft).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        role: &Role,
    ) -> error_stack::Result<(), KernelError> {
        PgRoleInternal::update(con.connection(), role).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &RoleId,
    ) -> error_stack::Result<(), KernelError> {
        PgRoleInternal::delete(con.connection(), id).await
    }

    async fn exists_by_unique_field(
        &self,
        con: &mut PostgresTransaction,
        name: &str,
    ) -> error_stack::Result<bool, KernelError> {
        PgRoleInternal::exists_by_name(con.connection(), name).await
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role::new(RoleId::new(row.id), RoleName::new(row.name))
    }
}

pub(in crate::database) struct PgRoleInternal;

impl PgRoleInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RoleId,
    ) -> error_stack::Result<Option<Role>, KernelError> {
        let row = sqlx::query_as::<_, RoleRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Role::from))
    }

    async fn find_page(
        con: &mut PgConnection,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Role>, i64), KernelError> {
        let filter = keyword_clause(Role::SEARCHABLE_COLUMNS);
        let pattern = keyword_pattern(query.keyword());

        let statement = format!(
            // language=postgresql
            r#"
            SELECT id, name
            FROM roles
            WHERE {filter}
            ORDER BY {sort} {order}
            OFFSET $2 LIMIT $3
            "#,
            sort = query.sort_column(),
            order = query.order().as_sql(),
        );
        let roles = sqlx::query_as::<_, RoleRow>(&statement)
            .bind(pattern.as_deref())
            .bind(query.offset())
            .bind(query.limit())
            .fetch_all(&mut *con)
            .await
            .convert_error()?
            .into_iter()
            .map(Role::from)
            .collect();

        let count_statement = format!(
            // language=postgresql
            "SELECT COUNT(*) FROM roles WHERE {filter}"
        );
        let total: i64 = sqlx::query_scalar(&count_statement)
            .bind(pattern.as_deref())
            .fetch_one(con)
            .await
            .convert_error()?;

        Ok((roles, total))
    }

    async fn create(
        con: &mut PgConnection,
        draft: RoleDraft,
    ) -> error_stack::Result<Role, KernelError> {
        let row = sqlx::query_as::<_, RoleRow>(
            // language=postgresql
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(draft.name.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Role::from(row))
    }

    async fn update(con: &mut PgConnection, role: &Role) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE roles
            SET name = $2
            WHERE id = $1
            "#,
        )
        .bind(role.id().as_ref())
        .bind(role.name().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &RoleId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn exists_by_name(
        con: &mut PgConnection,
        name: &str,
    ) -> error_stack::Result<bool, KernelError> {
        let exists: bool = sqlx::query_scalar(
            // language=postgresql
            r#"
            SELECT EXISTS (
                SELECT 1 FROM roles
                WHERE name = $1
            )
            "#,
        )
        .bind(name)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(exists)
    }
}
