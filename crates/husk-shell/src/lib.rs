//! Command interpreter and session layer for husk.
//!
//! The shell is a registry-based dispatch system over the in-memory
//! filesystem. Commands implement the [`Command`] trait and are
//! registered by name; the interpreter tokenizes input lines, splits
//! them into pipeline stages, and feeds each stage's output to the next
//! as a trailing argument. [`Session`] adds history and persistence on
//! top.

pub mod commands;
pub mod extra_commands;
pub mod history;
pub mod interpreter;
pub mod seed;
pub mod session;
pub mod storage;

/// Register the core command set (fs, history, help, session control).
pub use commands::register_builtins;
/// Register the demonstration commands (hello, cow, secret, base64).
pub use extra_commands::register_extras;
/// Bounded command history.
pub use history::History;
/// A single executable command trait.
pub use interpreter::Command;
/// Registry of available commands with pipeline dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
/// Output and signal produced by one input line.
pub use interpreter::{LineResult, Signal};
/// A live terminal session: filesystem, history, registry, store.
pub use session::Session;
/// Key-value persistence behind the session.
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
