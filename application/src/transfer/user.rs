use std::collections::BTreeSet;

use error_stack::Report;

use kernel::prelude::entity::{
    EmailAddress, PasswordHash, PhoneNumber, Profile, ProfileDraft, ProfileName, RoleId, StudentId,
    User, UserDraft, UserName, UserPatch,
};
use kernel::{FieldError, KernelError};

use crate::transfer::{check_length, given, positive, provided, report_unless_empty};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDto {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub student_id: Option<String>,
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        let profile = profile.into_destruct();
        Self {
            id: profile.id.into(),
            name: profile.name.into(),
            phone: profile.phone.into(),
            email: profile.email.into(),
            student_id: profile.student_id.map(Into::into),
        }
    }
}

/// Outbound view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub roles: Vec<i64>,
    pub holds: Vec<i64>,
    pub profile: Option<ProfileDto>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let user = user.into_destruct();
        Self {
            id: user.id.into(),
            username: user.username.into(),
            roles: user.roles.into_iter().map(i64::from).collect(),
            holds: user.holds.iter().map(|id| i64::from(*id)).collect(),
            profile: user.profile.map(ProfileDto::from),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProfileDto {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub student_id: Option<String>,
}

impl CreateProfileDto {
    fn validate(self, errors: &mut Vec<FieldError>) -> ProfileDraft {
        check_length(
            errors,
            "profile.name",
            &self.name,
            ProfileName::MIN_LENGTH,
            ProfileName::MAX_LENGTH,
        );
        check_length(errors, "profile.phone", &self.phone, 1, PhoneNumber::MAX_LENGTH);
        if !self.email.contains('@') {
            errors.push(FieldError::new(
                "profile.email",
                format!("{} is not a valid email address", self.email),
            ));
        }
        if let Some(student_id) = &self.student_id {
            check_length(
                errors,
                "profile.student_id",
                student_id,
                StudentId::MIN_LENGTH,
                StudentId::MAX_LENGTH,
            );
        }
        ProfileDraft {
            name: ProfileName::new(self.name),
            phone: PhoneNumber::new(self.phone),
            email: EmailAddress::new(self.email),
            student_id: self.student_id.map(StudentId::new),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub roles: Vec<i64>,
    pub profile: Option<CreateProfileDto>,
}

impl CreateUserDto {
    pub fn validate(self) -> error_stack::Result<UserDraft, KernelError> {
        let mut errors = Vec::new();

        check_length(
            &mut errors,
            "username",
            &self.username,
            UserName::MIN_LENGTH,
            UserName::MAX_LENGTH,
        );
        check_length(
            &mut errors,
            "password",
            &self.password,
            PasswordHash::MIN_RAW_LENGTH,
            PasswordHash::MAX_RAW_LENGTH,
        );
        for role in &self.roles {
            positive(&mut errors, "roles", *role);
        }
        let profile = self.profile.map(|profile| profile.validate(&mut errors));
        report_unless_empty(errors)?;

        Ok(UserDraft {
            username: UserName::new(self.username),
            password: hash_password(&self.password)?,
            roles: self.roles.into_iter().map(RoleId::new).collect(),
            profile,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<i64>>,
}

impl UpdateUserDto {
    pub fn validate(self) -> error_stack::Result<UserPatch, KernelError> {
        let mut errors = Vec::new();

        if let Some(username) = given(&self.username) {
            check_length(
                &mut errors,
                "username",
                username,
                UserName::MIN_LENGTH,
                UserName::MAX_LENGTH,
            );
        }
        if let Some(password) = given(&self.password) {
            check_length(
                &mut errors,
                "password",
                password,
                PasswordHash::MIN_RAW_LENGTH,
                PasswordHash::MAX_RAW_LENGTH,
            );
        }
        if let Some(roles) = &self.roles {
            for role in roles {
                positive(&mut errors, "roles", *role);
            }
        }
        report_unless_empty(errors)?;

        let password = match provided(self.password) {
            Some(raw) => Some(hash_password(&raw)?),
            None => None,
        };
        Ok(UserPatch {
            username: provided(self.username).map(UserName::new),
            password,
            roles: self
                .roles
                .map(|roles| roles.into_iter().map(RoleId::new).collect::<BTreeSet<_>>()),
        })
    }
}

fn hash_password(raw: &str) -> error_stack::Result<PasswordHash, KernelError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
        .map(PasswordHash::new)
        .map_err(|error| {
            Report::new(KernelError::Database)
                .attach_printable(format!("password hashing failed: {error}"))
        })
}
