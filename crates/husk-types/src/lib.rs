//! Foundation types for husk.
//!
//! This crate contains the types shared by all husk crates: the error
//! enum and `Result` alias, runtime configuration, and the cipher
//! service trait used by the `encrypt`/`decrypt` commands.

pub mod cipher;
pub mod config;
pub mod error;
