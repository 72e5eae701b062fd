//! Authentication primitives: Argon2id password hashing and HS256 JWTs.

pub mod jwt;
pub mod password;

pub use jwt::{create_token, validate_token, Claims, JwtError};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
