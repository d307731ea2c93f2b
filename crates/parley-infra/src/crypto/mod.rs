//! Cryptographic primitives: password hashing and token hashing.

pub mod password;
pub mod token;
