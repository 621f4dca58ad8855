mod holds;
mod id;
mod name;
mod password;

pub use self::{holds::*, id::*, name::*, password::*};

use std::collections::BTreeSet;

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::entity::{BookId, Profile, ProfileDraft, Revision, RoleId};
use crate::search::SearchPolicy;
use crate::store::{DeleteMode, Resource};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct User {
    id: UserId,
    username: UserName,
    password: PasswordHash,
    roles: BTreeSet<RoleId>,
    holds: HoldSet,
    profile: Option<Profile>,
    revision: Revision<User>,
}

impl User {
    pub fn new(
        id: UserId,
        username: UserName,
        password: PasswordHash,
        roles: BTreeSet<RoleId>,
        holds: HoldSet,
        profile: Option<Profile>,
        revision: Revision<User>,
    ) -> Self {
        Self {
            id,
            username,
            password,
            roles,
            holds,
            profile,
            revision,
        }
    }

    /// Records a hold. Returns `false` when the book is already held.
    pub fn hold(&mut self, book_id: BookId) -> bool {
        self.holds.insert(book_id)
    }

    /// Releases a hold. Returns `false` when the book was not held.
    pub fn release(&mut self, book_id: &BookId) -> bool {
        self.holds.remove(book_id)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserDraft {
    pub username: UserName,
    pub password: PasswordHash,
    pub roles: BTreeSet<RoleId>,
    pub profile: Option<ProfileDraft>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct UserPatch {
    pub username: Option<UserName>,
    pub password: Option<PasswordHash>,
    pub roles: Option<BTreeSet<RoleId>>,
}

impl Resource for User {
    type Id = UserId;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const KIND: &'static str = "user";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn id_from(id: i64) -> UserId {
        UserId::new(id)
    }

    fn apply(&mut self, patch: UserPatch) {
        self.substitute(|user| {
            if let Some(username) = patch.username {
                *user.username = username;
            }
            if let Some(password) = patch.password {
                *user.password = password;
            }
            if let Some(roles) = patch.roles {
                *user.roles = roles;
            }
        });
    }

    fn delete_mode(self) -> DeleteMode<Self> {
        DeleteMode::Hard
    }
}

impl SearchPolicy for User {
    const SORTABLE_COLUMNS: &'static [&'static str] = &["id", "username"];
    const SEARCHABLE_COLUMNS: &'static [&'static str] = &["username"];
}
