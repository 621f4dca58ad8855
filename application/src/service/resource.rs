use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::search::{Page, SearchPolicy, SearchSpec};
use kernel::interface::store::{DeleteMode, DependOnResourceStore, Resource, ResourceStore};
use kernel::KernelError;

pub(in crate::service) fn positive_id<R: Resource>(
    id: i64,
) -> error_stack::Result<R::Id, KernelError> {
    if id <= 0 {
        return Err(Report::new(KernelError::Validation)
            .attach_printable(format!("{} id = {id} must be a positive integer", R::KIND)));
    }
    Ok(R::id_from(id))
}

pub(in crate::service) fn not_found<R: Resource>(id: &R::Id) -> Report<KernelError> {
    Report::new(KernelError::NotFound)
        .attach_printable(format!("{} id = {} is not found", R::KIND, id.as_ref()))
}

/// Search, detail, create, update and delete over one entity type,
/// implemented once against [`ResourceStore`] and instantiated per entity.
#[async_trait::async_trait]
pub trait ResourceService<Connection, Store>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnResourceStore<Connection, Store>
where
    Connection: Transaction + Send,
    Store: ResourceStore<Connection>,
{
    async fn search(
        &self,
        spec: SearchSpec,
    ) -> error_stack::Result<Page<Store::Resource>, KernelError> {
        let query = <Store::Resource as SearchPolicy>::build_query(&spec)?;
        tracing::debug!(kind = Store::Resource::KIND, ?query, "search");

        let mut con = self.database_connection().transact().await?;
        let (items, total) = self.resource_store().find_page(&mut con, &query).await?;
        con.commit().await?;

        Ok(Page::new(*spec.page(), *spec.size(), total, items))
    }

    async fn detail(&self, id: i64) -> error_stack::Result<Store::Resource, KernelError> {
        let id = positive_id::<Store::Resource>(id)?;

        let mut con = self.database_connection().transact().await?;
        let found = self.resource_store().find_by_id(&mut con, &id).await?;
        con.commit().await?;

        found.ok_or_else(|| not_found::<Store::Resource>(&id))
    }

    async fn create(
        &self,
        draft: <Store::Resource as Resource>::Draft,
    ) -> error_stack::Result<Store::Resource, KernelError> {
        tracing::debug!(kind = Store::Resource::KIND, ?draft, "create");

        let mut con = self.database_connection().transact().await?;
        let created = self.resource_store().create(&mut con, draft).await?;
        con.commit().await?;

        tracing::info!(
            kind = Store::Resource::KIND,
            id = *created.id().as_ref(),
            "created"
        );
        Ok(created)
    }

    async fn update(
        &self,
        id: i64,
        patch: <Store::Resource as Resource>::Patch,
    ) -> error_stack::Result<Store::Resource, KernelError> {
        let id = positive_id::<Store::Resource>(id)?;
        tracing::debug!(kind = Store::Resource::KIND, ?patch, "update");

        let mut con = self.database_connection().transact().await?;
        let mut resource = self
            .resource_store()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| not_found::<Store::Resource>(&id))?;
        resource.apply(patch);
        self.resource_store().update(&mut con, &resource).await?;
        con.commit().await?;

        Ok(resource)
    }

    async fn delete(&self, id: i64) -> error_stack::Result<(), KernelError> {
        let id = positive_id::<Store::Resource>(id)?;

        let mut con = self.database_connection().transact().await?;
        let resource = self
            .resource_store()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| not_found::<Store::Resource>(&id))?;
        match resource.delete_mode() {
            DeleteMode::Soft(marked) => {
                self.resource_store().update(&mut con, &marked).await?;
            }
            DeleteMode::Hard => {
                self.resource_store().delete(&mut con, &id).await?;
            }
        }
        con.commit().await?;

        tracing::info!(
            kind = Store::Resource::KIND,
            id = *id.as_ref(),
            "deleted"
        );
        Ok(())
    }

    /// Pre-check for a uniqueness invariant (code, username, role name).
    /// The store remains the arbiter under concurrent inserts.
    async fn exists(&self, value: &str) -> error_stack::Result<bool, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let exists = self
            .resource_store()
            .exists_by_unique_field(&mut con, value)
            .await?;
        con.commit().await?;
        Ok(exists)
    }
}

impl<Connection, Store, T> ResourceService<Connection, Store> for T
where
    Connection: Transaction + Send,
    Store: ResourceStore<Connection>,
    T: DependOnDatabaseConnection<Connection> + DependOnResourceStore<Connection, Store>,
{
}
