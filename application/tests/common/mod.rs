use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::search::{SearchQuery, SortOrder};
use kernel::interface::store::{
    DependOnBookStore, DependOnResourceStore, DependOnRoleStore, DependOnUserStore, Resource,
    ResourceStore,
};
use kernel::prelude::entity::{
    Book, BookDraft, BookId, BookStatus, HoldSet, Profile, ProfileId, Revision, Role, RoleDraft,
    RoleId, User, UserDraft, UserId,
};
use kernel::KernelError;

pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub struct MemoryTransaction;

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

/// Shared-state stand-in for the Postgres driver. Clones observe the
/// same rows, which is what the concurrency tests rely on.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    books: MemoryBookStore,
    users: MemoryUserStore,
    roles: MemoryRoleStore,
}

#[async_trait::async_trait]
impl DatabaseConnection<MemoryTransaction> for MemoryDatabase {
    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        Ok(MemoryTransaction)
    }
}

impl DependOnResourceStore<MemoryTransaction, MemoryBookStore> for MemoryDatabase {
    fn resource_store(&self) -> &MemoryBookStore {
        &self.books
    }
}

impl DependOnResourceStore<MemoryTransaction, MemoryUserStore> for MemoryDatabase {
    fn resource_store(&self) -> &MemoryUserStore {
        &self.users
    }
}

impl DependOnResourceStore<MemoryTransaction, MemoryRoleStore> for MemoryDatabase {
    fn resource_store(&self) -> &MemoryRoleStore {
        &self.roles
    }
}

impl DependOnBookStore<MemoryTransaction> for MemoryDatabase {
    type BookStore = MemoryBookStore;
    fn book_store(&self) -> &MemoryBookStore {
        &self.books
    }
}

impl DependOnUserStore<MemoryTransaction> for MemoryDatabase {
    type UserStore = MemoryUserStore;
    fn user_store(&self) -> &MemoryUserStore {
        &self.users
    }
}

impl DependOnRoleStore<MemoryTransaction> for MemoryDatabase {
    type RoleStore = MemoryRoleStore;
    fn role_store(&self) -> &MemoryRoleStore {
        &self.roles
    }
}

fn page<R: Resource>(
    mut items: Vec<R>,
    query: &SearchQuery,
    compare: impl Fn(&R, &R) -> std::cmp::Ordering,
) -> (Vec<R>, i64) {
    items.sort_by(|a, b| match query.order() {
        SortOrder::Asc => compare(a, b),
        SortOrder::Desc => compare(a, b).reverse(),
    });
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(*query.offset() as usize)
        .take(*query.limit() as usize)
        .collect();
    (items, total)
}

fn text<T: AsRef<String>>(value: &T) -> &str {
    value.as_ref()
}

fn contains(haystack: &str, keyword: &Option<String>) -> bool {
    match keyword {
        None => true,
        Some(keyword) => haystack.to_lowercase().contains(keyword),
    }
}

#[derive(Clone, Default)]
pub struct MemoryBookStore {
    rows: Arc<Mutex<BTreeMap<i64, Book>>>,
    sequence: Arc<AtomicI64>,
}

#[async_trait::async_trait]
impl ResourceStore<MemoryTransaction> for MemoryBookStore {
    type Resource = Book;

    async fn find_by_id(
        &self,
        _con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(self.rows.lock().unwrap().get(id.as_ref()).cloned())
    }

    async fn find_page(
        &self,
        _con: &mut MemoryTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Book>, i64), KernelError> {
        let rows = self.rows.lock().unwrap();
        let matched = rows
            .values()
            .filter(|book| {
                let keyword = query.keyword();
                contains(book.category().as_str(), keyword)
                    || contains(book.title().as_ref(), keyword)
                    || contains(book.author().as_ref(), keyword)
                    || book
                        .description()
                        .as_ref()
                        .is_some_and(|description| contains(description.as_ref(), keyword))
            })
            .cloned()
            .collect::<Vec<_>>();
        fn description(book: &Book) -> Option<&String> {
            book.description().as_ref().map(|description| description.as_ref())
        }
        let sort = *query.sort_column();
        Ok(page(matched, query, |a, b| match sort {
            "code" => text(a.code()).cmp(text(b.code())),
            "title" => text(a.title()).cmp(text(b.title())),
            "author" => text(a.author()).cmp(text(b.author())),
            "category" => a.category().as_str().cmp(b.category().as_str()),
            "description" => description(a).cmp(&description(b)),
            _ => a.id().as_ref().cmp(b.id().as_ref()),
        }))
    }

    async fn create(
        &self,
        _con: &mut MemoryTransaction,
        draft: BookDraft,
    ) -> error_stack::Result<Book, KernelError> {
        let mut rows = self.rows.lock().unwrap();
        let duplicated = rows.values().any(|book| {
            book.code() == &draft.code && *book.status() != BookStatus::Deleted
        });
        if duplicated {
            return Err(Report::new(KernelError::Duplicated)
                .attach_printable(format!("book code = {:?} already exists", draft.code)));
        }
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let book = Book::new(
            BookId::new(id),
            draft.code,
            draft.title,
            draft.author,
            draft.category,
            draft.status,
            draft.description,
        );
        rows.insert(id, book.clone());
        Ok(book)
    }

    async fn update(
        &self,
        _con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        self.rows
            .lock()
            .unwrap()
            .insert(*book.id().as_ref(), book.clone());
        Ok(())
    }

    async fn delete(
        &self,
        _con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        self.rows.lock().unwrap().remove(id.as_ref());
        Ok(())
    }

    async fn exists_by_unique_field(
        &self,
        _con: &mut MemoryTransaction,
        code: &str,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(self.rows.lock().unwrap().values().any(|book| {
            book.code().as_ref() == code && *book.status() != BookStatus::Deleted
        }))
    }
}

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<Mutex<BTreeMap<i64, User>>>,
    sequence: Arc<AtomicI64>,
}

#[async_trait::async_trait]
impl ResourceStore<MemoryTransaction> for MemoryUserStore {
    type Resource = User;

    async fn find_by_id(
        &self,
        _con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(self.rows.lock().unwrap().get(id.as_ref()).cloned())
    }

    async fn find_page(
        &self,
        _con: &mut MemoryTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<User>, i64), KernelError> {
        let rows = self.rows.lock().unwrap();
        let matched = rows
            .values()
            .filter(|user| contains(user.username().as_ref(), query.keyword()))
            .cloned()
            .collect::<Vec<_>>();
        let sort = *query.sort_column();
        Ok(page(matched, query, |a, b| match sort {
            "username" => text(a.username()).cmp(text(b.username())),
            _ => a.id().as_ref().cmp(b.id().as_ref()),
        }))
    }

    async fn create(
        &self,
        _con: &mut MemoryTransaction,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        let mut rows = self.rows.lock().unwrap();
        let duplicated = rows.values().any(|user| user.username() == &draft.username);
        if duplicated {
            return Err(Report::new(KernelError::Duplicated)
                .attach_printable(format!("username = {:?} already exists", draft.username)));
        }
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let profile = draft.profile.map(|profile| {
            Profile::new(
                ProfileId::new(id),
                profile.name,
                profile.phone,
                profile.email,
                profile.student_id,
            )
        });
        let user = User::new(
            UserId::new(id),
            draft.username,
            draft.password,
            draft.roles,
            HoldSet::default(),
            profile,
            Revision::new(0),
        );
        rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        _con: &mut MemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        let mut rows = self.rows.lock().unwrap();
        let current = rows.get(user.id().as_ref()).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("user id = {} is not found", user.id().as_ref()))
        })?;
        if current.revision() != user.revision() {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "user id = {} was updated concurrently",
                user.id().as_ref()
            )));
        }
        let next = user.revision().next();
        let mut updated = user.clone();
        updated.substitute(|user| {
            *user.revision = next;
        });
        rows.insert(*user.id().as_ref(), updated);
        Ok(())
    }

    async fn delete(
        &self,
        _con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        self.rows.lock().unwrap().remove(id.as_ref());
        Ok(())
    }

    async fn exists_by_unique_field(
        &self,
        _con: &mut MemoryTransaction,
        username: &str,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .any(|user| user.username().as_ref() == username))
    }
}

#[derive(Clone, Default)]
pub struct MemoryRoleStore {
    rows: Arc<Mutex<BTreeMap<i64, Role>>>,
    sequence: Arc<AtomicI64>,
}

#[async_trait::async_trait]
impl ResourceStore<MemoryTransaction> for MemoryRoleStore {
    type Resource = Role;

    async fn find_by_id(
        &self,
        _con: &mut MemoryTransaction,
        id: &RoleId,
    ) -> error_stack::Result<Option<Role>, KernelError> {
        Ok(self.rows.lock().unwrap().get(id.as_ref()).cloned())
    }

    async fn find_page(
        &self,
        _con: &mut MemoryTransaction,
        query: &SearchQuery,
    ) -> error_stack::Result<(Vec<Role>, i64), KernelError> {
        let rows = self.rows.lock().unwrap();
        let matched = rows
            .values()
            .filter(|role| contains(role.name().as_ref(), query.keyword()))
            .cloned()
            .collect::<Vec<_>>();
        let sort = *query.sort_column();
        Ok(page(matched, query, |a, b| match sort {
            "name" => text(a.name()).cmp(text(b.name())),
            _ => a.id().as_ref().cmp(b.id().as_ref()),
        }))
    }

    async fn create(
        &self,
        _con: &mut MemoryTransaction,
        draft: RoleDraft,
    ) -> error_stack::Result<Role, KernelError> {
        let mut rows = self.rows.lock().unwrap();
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let role = Role::new(RoleId::new(id), draft.name);
        rows.insert(id, role.clone());
        Ok(role)
    }

    async fn update(
        &self,
        _con: &mut MemoryTransaction,
        role: &Role,
    ) -> error_stack::Result<(), KernelError> {
        self.rows
            .lock()
            .unwrap()
            .insert(*role.id().as_ref(), role.clone());
        Ok(())
    }

    async fn delete(
        &self,
        _con: &mut MemoryTransaction,
        id: &RoleId,
    ) -> error_stack::Result<(), KernelError> {
        self.rows.lock().unwrap().remove(id.as_ref());
        Ok(())
    }

    async fn exists_by_unique_field(
        &self,
        _con: &mut MemoryTransaction,
        name: &str,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .any(|role| role.name().as_ref() == name))
    }
}
