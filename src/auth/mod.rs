//! Authentication: password hashing, credential checks, and sessions.
//!
//! - [`password`]: Argon2id hashing in PHC format
//! - [`authenticator`]: credential verification with collapsed failures
//! - [`session`]: JWT issuance, verification, and forced invalidation

pub mod authenticator;
pub mod password;
pub mod session;

pub use authenticator::authenticate;
pub use password::{hash_password, verify_password};
pub use session::{Claims, SessionManager};
