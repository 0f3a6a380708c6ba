pub mod identity;

pub use identity::{Authenticator, Principal, RoleTable, USER_HEADER};
