mod id;
mod name;

pub use self::{id::*, name::*};

use destructure::{Destructure, Mutation};
use vodca::References;

use crate::search::SearchPolicy;
use crate::store::{DeleteMode, Resource};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Role {
    id: RoleId,
    name: RoleName,
}

impl Role {
    pub fn new(id: RoleId, name: RoleName) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoleDraft {
    pub name: RoleName,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct RolePatch {
    pub name: Option<RoleName>,
}

impl Resource for Role {
    type Id = RoleId;
    type Draft = RoleDraft;
    type Patch = RolePatch;

    const KIND: &'static str = "role";

    fn id(&self) -> &RoleId {
        &self.id
    }

    fn id_from(id: i64) -> RoleId {
        RoleId::new(id)
    }

    fn apply(&mut self, patch: RolePatch) {
        self.substitute(|role| {
            if let Some(name) = patch.name {
                *role.name = name;
            }
        });
    }

    fn delete_mode(self) -> DeleteMode<Self> {
        DeleteMode::Hard
    }
}

impl SearchPolicy for Role {
    const SORTABLE_COLUMNS: &'static [&'static str] = &["id", "name"];
    const SEARCHABLE_COLUMNS: &'static [&'static str] = &["name"];
}
