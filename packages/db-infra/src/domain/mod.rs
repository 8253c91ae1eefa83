//! Project naming and account model.

pub mod account;
pub mod project;

pub use account::{AccountRole, AccountSpec};
pub use project::Project;
