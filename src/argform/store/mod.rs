//! # Persistence Layer
//!
//! Storage is abstracted behind the [`Storage`] trait so the parser can
//! work against different backends:
//!
//! - [`fs::FileStorage`]: production JSON-file storage, at an explicit
//!   path or at a per-user config location
//! - [`memory::InMemoryStorage`]: in-memory storage for tests and
//!   ephemeral hosts
//!
//! ## Load-once semantics
//!
//! The parser only *reads* from storage, once per argument, at add time —
//! a stored value overrides the argument's default before the
//! presentation is bound. The only write the parser ever issues is
//! [`Storage::clear`]. Persisting live edits is deliberately left to the
//! host: connect a handler to the parser's `changed` signal and call
//! [`Storage::set_value`] from there.

use crate::error::Result;
use crate::value::Value;

pub mod fs;
pub mod memory;

pub use fs::FileStorage;
pub use memory::InMemoryStorage;

/// Abstract key/value store consulted for argument default overrides.
pub trait Storage {
    /// Stored value for `key`, if any.
    fn value(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    fn set_value(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Remove every stored entry.
    fn clear(&mut self) -> Result<()>;

    /// Human-readable location of the store, for logging.
    fn describe(&self) -> String;
}
