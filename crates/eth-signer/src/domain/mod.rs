//! # Domain Layer
//!
//! Pure key-handling and signing logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod ecdsa;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod keys;
pub mod packet;
