mod lending;
mod resource;

pub use self::{lending::*, resource::*};
