mod email;
mod id;
mod name;
mod phone;
mod student_id;

pub use self::{email::*, id::*, name::*, phone::*, student_id::*};

use destructure::Destructure;
use vodca::References;

/// Contact details owned by exactly one user. Created together with the
/// user and read back as part of the aggregate.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Profile {
    id: ProfileId,
    name: ProfileName,
    phone: PhoneNumber,
    email: EmailAddress,
    student_id: Option<StudentId>,
}

impl Profile {
    pub fn new(
        id: ProfileId,
        name: ProfileName,
        phone: PhoneNumber,
        email: EmailAddress,
        student_id: Option<StudentId>,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            email,
            student_id,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProfileDraft {
    pub name: ProfileName,
    pub phone: PhoneNumber,
    pub email: EmailAddress,
    pub student_id: Option<StudentId>,
}
