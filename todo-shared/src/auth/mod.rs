/// Credential handling
///
/// Only password hashing lives here. Registration does not issue tokens or
/// sessions.

pub mod password;
