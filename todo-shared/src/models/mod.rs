/// Database models
///
/// # Models
///
/// - `todo`: Todo items
/// - `user`: Registered user accounts
///
/// Models run their SQL through [`Database`](crate::db::Database) rather than
/// holding a pool of their own.

pub mod todo;
pub mod user;

pub use todo::Todo;
pub use user::{NewUser, PublicUser, User};
