mod book;
mod common;
mod profile;
mod role;
mod user;

pub use self::{book::*, common::*, profile::*, role::*, user::*};
