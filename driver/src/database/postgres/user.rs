use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::search::{SearchPolicy, SearchQuery};
use kernel::interface::store::ResourceStore;
use kernel::prelude::entity::{
    BookId, EmailAddress, HoldSet, PasswordHash, PhoneNumber, Profile, ProfileDraft, ProfileId,
    ProfileName, Revision, RoleId, StudentId, User, UserDraft, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::{keyword_clause, keyword_pattern, PostgresTransaction};
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy)]
pub struct PostgresUserStore;

#[async_trait::async_trait]
impl ResourceStore<PostgresTransaction> for PostgresUserStore {
    type Resource = User;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con.connection(), id).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<User>, i64), KernelError> {
        PgUserInternal::find_page(con.connection(), query).await
    }

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::create(con.connection(), draft).await
    }

    /// Compare-and-set on the revision column. Fails with
    /// [`KernelError::Conflict`] when the loaded revision is stale.
    async fn update(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::update(con.connection(), user).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::delete(con.connection(), id).await
    }

    async fn exists_by_unique_field(
        &self,
        con: &mut PostgresTransaction,
        username: &str,
    ) -> error_stack::Result<bool, KernelError> {
        PgUserInternal::exists_by_username(con.connection(), username).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    revision: i64,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    student_id: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile::new(
            ProfileId::new(row.id),
            ProfileName::new(row.name),
            PhoneNumber::new(row.phone),
            EmailAddress::new(row.email),
            row.student_id.map(StudentId::new),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    // Roles, holds and the profile live in child tables; every read
    // reassembles the aggregate.
    async fn load(con: &mut PgConnection, row: UserRow) -> error_stack::Result<User, KernelError> {
        let roles: Vec<i64> = sqlx::query_scalar(
            // language=postgresql
            r#"
            SELECT role_id FROM user_role
            WHERE user_id = $1
            ORDER BY role_id
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        let holds: Vec<i64> = sqlx::query_scalar(
            // language=postgresql
            r#"
            SELECT book_id FROM user_hold_book
            WHERE user_id = $1
            ORDER BY book_id
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        let profile = sqlx::query_as::<_, ProfileRow>(
            // language=postgresql
            r#"
            SELECT id, name, phone, email, student_id FROM user_profile
            WHERE user_id = $1
            "#,
        )
        .bind(row.id)
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;

        Ok(User::new(
            UserId::new(row.id),
            UserName::new(row.username),
            PasswordHash::new(row.password),
            roles.into_iter().map(RoleId::new).collect(),
            HoldSet::new(holds.into_iter().map(BookId::new)),
            profile.map(Profile::from),
            Revision::new(row.revision),
        ))
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, username, password, revision
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;
        match row {
            Some(row) => Ok(Some(Self::load(con, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_page(
        con: &mut PgConnection,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<User>, i64), KernelError> {
        let filter = keyword_clause(User::SEARCHABLE_COLUMNS);
        let pattern = keyword_pattern(query.keyword());

        let statement = format!(
            // language=postgresql
            r#"
            SELECT id, username, password, revision
            FROM users
            WHERE {filter}
            ORDER BY {sort} {order}
            OFFSET $2 LIMIT $3
            "#,
            sort = query.sort_column(),
            order = query.order().as_sql(),
        );
        let rows = sqlx::query_as::<_, UserRow>(&statement)
            .bind(pattern.as_deref())
            .bind(query.offset())
            .bind(query.limit())
            .fetch_all(&mut *con)
            .await
            .convert_error()?;
        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(Self::load(&mut *con, row).await?);
        }

        let count_statement = format!(
            // language=postgresql
            "SELECT COUNT(*) FROM users WHERE {filter}"
        );
        let total: i64 = sqlx::query_scalar(&count_statement)
            .bind(pattern.as_deref())
            .fetch_one(con)
            .await
            .convert_error()?;

        Ok((users, total))
    }

    async fn create(
        con: &mut PgConnection,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            INSERT INTO users (username, password, revision)
            VALUES ($1, $2, 0)
            RETURNING id, username, password, revision
            "#,
        )
        .bind(draft.username.as_ref())
        .bind(draft.password.as_ref())
        .fetch_one(&mut *con)
        .await
        .convert_error()?;
        let id = row.id;

        for role in &draft.roles {
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO user_role (user_id, role_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(id)
            .bind(role.as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        let profile = match draft.profile {
            Some(profile) => Some(Self::create_profile(con, id, profile).await?),
            None => None,
        };

        Ok(User::new(
            UserId::new(row.id),
            UserName::new(row.username),
            PasswordHash::new(row.password),
            draft.roles,
            HoldSet::default(),
            profile,
            Revision::new(row.revision),
        ))
    }

    async fn create_profile(
        con: &mut PgConnection,
        user_id: i64,
        draft: ProfileDraft,
    ) -> error_stack::Result<Profile, KernelError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            // language=postgresql
            r#"
            INSERT INTO user_profile (user_id, name, phone, email, student_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, phone, email, student_id
            "#,
        )
        .bind(user_id)
        .bind(draft.name.as_ref())
        .bind(draft.phone.as_ref())
        .bind(draft.email.as_ref())
        .bind(draft.student_id.as_ref().map(|student_id| student_id.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Profile::from(row))
    }

    async fn update(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        let next = user.revision().next();
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE users
            SET username = $2, password = $3, revision = $4
            WHERE id = $1 AND revision = $5
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.username().as_ref())
        .bind(user.password().as_ref())
        .bind(next.as_ref())
        .bind(user.revision().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "user id = {} was updated concurrently",
                user.id().as_ref()
            )));
        }

        // language=postgresql
        sqlx::query("DELETE FROM user_role WHERE user_id = $1")
            .bind(user.id().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        for role in user.roles() {
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO user_role (user_id, role_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(user.id().as_ref())
            .bind(role.as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }

        // language=postgresql
        sqlx::query("DELETE FROM user_hold_book WHERE user_id = $1")
            .bind(user.id().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        for book in user.holds().iter() {
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO user_hold_book (user_id, book_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(user.id().as_ref())
            .bind(book.as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }

        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &UserId) -> error_stack::Result<(), KernelError> {
        for statement in [
            // language=postgresql
            "DELETE FROM user_role WHERE user_id = $1",
            "DELETE FROM user_hold_book WHERE user_id = $1",
            "DELETE FROM user_profile WHERE user_id = $1",
            "DELETE FROM users WHERE id = $1",
        ] {
            sqlx::query(statement)
                .bind(id.as_ref())
                .execute(&mut *con)
                .await
                .convert_error()?;
        }
        Ok(())
    }

    async fn exists_by_username(
        con: &mut PgConnection,
        username: &str,
    ) -> error_stack::Result<bool, KernelError> {
        let exists: bool = sqlx::query_scalar(
            // language=postgresql
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1
            )
            "#,
        )
        .bind(username)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(exists)
    }
}
