//! # Argform Architecture
//!
//! Argform is a **presentation-agnostic argument model**: a caller
//! declares a set of typed, named parameters and a UI layer of its
//! choosing renders them. The crate knows nothing about widgets; it owns
//! the part of a settings UI that has actual invariants — values,
//! defaults, change propagation, ordering, persistence overrides.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (external)                                    │
//! │  - Renders widgets, wires user input                        │
//! │  - Implements ValueBinding per widget kind                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Parser (parser.rs)                                         │
//! │  - Ordered, duplicate-free registry of arguments            │
//! │  - Applies stored overrides, binds presentations            │
//! │  - Aggregate changed signal, reset affordances              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Argument (argument.rs, value.rs, signal.rs, binding.rs)    │
//! │  - Typed metadata, per-kind write policies                  │
//! │  - read/write through the bound ValueBinding                │
//! │  - Per-argument changed signal                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - Abstract Storage trait                                   │
//! │  - FileStorage (production), InMemoryStorage (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use argform::{Argument, Parser, Value};
//!
//! let mut parser = Parser::new();
//! parser.add("name", "Marcus")?;
//! parser.add("age", 33)?;
//! parser.add_with(
//!     Argument::enumeration("class")
//!         .items(["Ranger", "Warrior", "Sorcerer", "Monk"])
//!         .default(2),
//! )?;
//!
//! parser.changed().connect(|arg| {
//!     println!("{} was changed!", arg.name());
//! });
//!
//! let age = parser.find("age")?;
//! age.write(41)?;
//! assert!(age.is_edited()?);
//! assert_eq!(parser.find("class")?.read()?, Value::Str("Sorcerer".into()));
//! # Ok::<(), argform::ArgformError>(())
//! ```
//!
//! ## Threading
//!
//! The entire API is single-threaded by design, mirroring the UI event
//! loops it feeds: change notifications are synchronous, re-entrant
//! callbacks, and the types are deliberately not `Send` or `Sync`. Keep a
//! parser and its arguments on one logical thread.

pub mod argument;
pub mod binding;
pub mod error;
pub mod parser;
pub mod signal;
pub mod store;
pub mod value;

pub use argument::{camel_to_title, ArgKind, Argument, ArgumentBuilder};
pub use binding::{default_binding, BindingFactory, FixedBinding, MemoryBinding, ValueBinding};
pub use error::{ArgformError, Result};
pub use parser::Parser;
pub use signal::{Signal, SlotId};
pub use store::{FileStorage, InMemoryStorage, Storage};
pub use value::Value;
