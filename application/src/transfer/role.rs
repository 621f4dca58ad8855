use kernel::prelude::entity::{Role, RoleDraft, RoleName, RolePatch};
use kernel::KernelError;

use crate::transfer::{check_length, given, provided, report_unless_empty};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        let role = role.into_destruct();
        Self {
            id: role.id.into(),
            name: role.name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateRoleDto {
    pub name: String,
}

impl CreateRoleDto {
    pub fn validate(self) -> error_stack::Result<RoleDraft, KernelError> {
        let mut errors = Vec::new();
        check_length(
            &mut errors,
            "name",
            &self.name,
            RoleName::MIN_LENGTH,
            RoleName::MAX_LENGTH,
        );
        report_unless_empty(errors)?;
        Ok(RoleDraft {
            name: RoleName::new(self.name),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRoleDto {
    pub name: Option<String>,
}

impl UpdateRoleDto {
    pub fn validate(self) -> error_stack::Result<RolePatch, KernelError> {
        let mut errors = Vec::new();
        if let Some(name) = given(&self.name) {
            check_length(
                &mut errors,
                "name",
                name,
                RoleName::MIN_LENGTH,
                RoleName::MAX_LENGTH,
            );
        }
        report_unless_empty(errors)?;
        Ok(RolePatch {
            name: provided(self.name).map(RoleName::new),
        })
    }
}
