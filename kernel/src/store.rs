use std::fmt::Debug;
use std::hash::Hash;

use crate::database::Transaction;
use crate::entity::{Book, Role, User};
use crate::search::{SearchPolicy, SearchQuery};
use crate::KernelError;

/// A persistent entity with a store-assigned integer identifier.
pub trait Resource: 'static + Sync + Send + Clone + Debug {
    type Id: 'static + Sync + Send + Clone + Eq + Hash + Debug + AsRef<i64>;
    type Draft: 'static + Send + Debug;
    type Patch: 'static + Send + Debug;

    /// Lower-case noun used in log and error messages.
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
    fn id_from(id: i64) -> Self::Id;
    /// Partial update: fields left `None` keep their current value.
    fn apply(&mut self, patch: Self::Patch);
    /// Whether rows disappear or are only marked on delete.
    fn delete_mode(self) -> DeleteMode<Self>;
}

#[derive(Debug)]
pub enum DeleteMode<R> {
    Hard,
    Soft(R),
}

#[async_trait::async_trait]
pub trait ResourceStore<Connection: Transaction>: 'static + Sync + Send {
    type Resource: Resource + SearchPolicy;

    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &<Self::Resource as Resource>::Id,
    ) -> error_stack::Result<Option<Self::Resource>, KernelError>;

    async fn find_page(
        &self,
        con: &mut Connection,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Self::Resource>, i64), KernelError>;

    async fn create(
        &self,
        con: &mut Connection,
        draft: <Self::Resource as Resource>::Draft,
    ) -> error_stack::Result<Self::Resource, KernelError>;

    async fn update(
        &self,
        con: &mut Connection,
        resource: &Self::Resource,
    ) -> error_stack::Result<(), KernelError>;

    async fn delete(
        &self,
        con: &mut Connection,
        id: &<Self::Resource as Resource>::Id,
    ) -> error_stack::Result<(), KernelError>;

    async fn exists_by_unique_field(
        &self,
        con: &mut Connection,
        value: &str,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnResourceStore<Connection: Transaction, Store: ResourceStore<Connection>>:
    'static + Sync + Send
{
    fn resource_store(&self) -> &Store;
}

pub trait DependOnBookStore<Connection: Transaction>: 'static + Sync + Send {
    type BookStore: ResourceStore<Connection, Resource = Book>;
    fn book_store(&self) -> &Self::BookStore;
}

pub trait DependOnUserStore<Connection: Transaction>: 'static + Sync + Send {
    type UserStore: ResourceStore<Connection, Resource = User>;
    fn user_store(&self) -> &Self::UserStore;
}

pub trait DependOnRoleStore<Connection: Transaction>: 'static + Sync + Send {
    type RoleStore: ResourceStore<Connection, Resource = Role>;
    fn role_store(&self) -> &Self::RoleStore;
}
