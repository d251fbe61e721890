// ABOUTME: Credential handling for Canopy
// ABOUTME: Argon2 password hashing and JWT issuance/verification

pub mod error;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtAuth};
pub use password::{hash_password, verify_password};
