//! # The Argument Parser
//!
//! [`Parser`] is the registry: an insertion-ordered, duplicate-free
//! collection of [`Argument`]s plus one aggregate `changed` signal.
//!
//! Adding an argument wires up the whole protocol in one step:
//!
//! 1. reject duplicate names (the registry is untouched on failure);
//! 2. consult the optional [`Storage`] adapter and, when a stored value
//!    exists for the name, coerce it to the argument's kind and override
//!    the default with it;
//! 3. bind the argument to a presentation through the binding factory
//!    (a headless in-memory presentation unless the host installed its
//!    own factory);
//! 4. subscribe to the argument's `changed` signal — each change
//!    recomputes the edited state, updates the reset-affordance flag and
//!    re-emits the parser's aggregate signal with the argument;
//! 5. append to the ordered collection.
//!
//! The parser reads from storage only at add time and writes only on
//! [`Parser::clear`]. Edits are not persisted automatically; a host that
//! wants save-on-change connects a handler to [`Parser::changed`] and
//! calls [`Storage::set_value`] itself.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::argument::{coerce_stored, ArgKind, Argument, ArgumentBuilder};
use crate::binding::{default_binding, BindingFactory};
use crate::error::{ArgformError, Result};
use crate::signal::Signal;
use crate::store::Storage;
use crate::value::Value;

struct Entry {
    argument: Argument,
    /// Whether the reset affordance for this argument should be shown.
    /// Tracks the argument's edited state; starts hidden.
    reset_visible: Rc<Cell<bool>>,
}

/// Ordered, duplicate-free registry of arguments.
pub struct Parser {
    arguments: IndexMap<String, Entry>,
    storage: Option<Box<dyn Storage>>,
    factory: BindingFactory,
    changed: Rc<Signal<Argument>>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            arguments: IndexMap::new(),
            storage: None,
            factory: Box::new(default_binding),
            changed: Rc::new(Signal::new()),
        }
    }

    /// A parser whose argument defaults can be overridden by `storage`.
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        info!("Storing settings at {}", storage.describe());
        let mut parser = Self::new();
        parser.storage = Some(storage);
        parser
    }

    /// Install a presentation-binding factory. Call before adding
    /// arguments; already-added arguments keep their bindings.
    pub fn set_binding_factory(&mut self, factory: BindingFactory) {
        self.factory = factory;
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Aggregate change signal; the payload is the argument that changed.
    pub fn changed(&self) -> &Signal<Argument> {
        &self.changed
    }

    /// Add a pre-built argument. Returns the same handle for chaining
    /// subscriptions or writes.
    pub fn add_argument(&mut self, argument: Argument) -> Result<Argument> {
        let name = argument.name().to_string();
        if self.arguments.contains_key(&name) {
            return Err(ArgformError::DuplicateName(name));
        }

        if let Some(storage) = &self.storage {
            if let Some(stored) = storage.value(&name) {
                match coerce_stored(argument.kind(), stored.clone(), argument.items()) {
                    Some(value) => {
                        debug!("Overriding default of '{}' with stored {}", name, value);
                        argument.set_default(value);
                    }
                    None => warn!(
                        "Stored value '{}' does not fit {} argument '{}'; ignoring",
                        stored,
                        argument.kind(),
                        name
                    ),
                }
            }
        }

        if !argument.is_bound() {
            let binding = (self.factory)(&argument)?;
            argument.create(binding)?;
        }

        let reset_visible = Rc::new(Cell::new(false));
        let aggregate = Rc::clone(&self.changed);
        let flag = Rc::clone(&reset_visible);
        argument.changed().connect(move |arg: &Argument| {
            flag.set(arg.is_edited().unwrap_or(false));
            aggregate.emit(arg);
        });

        self.arguments.insert(
            name,
            Entry {
                argument: argument.clone(),
                reset_visible,
            },
        );
        Ok(argument)
    }

    /// Add by name, inferring the kind from the default value.
    ///
    /// `Nil` and strings become String arguments, integers Integer,
    /// floats Float, booleans Boolean. A list default becomes an Enum
    /// over those items, defaulting to the first.
    pub fn add(&mut self, name: &str, default: impl Into<Value>) -> Result<Argument> {
        let default = default.into();
        let kind = ArgKind::infer(&default);

        let mut builder = ArgumentBuilder::new(kind, name);
        builder = match default {
            Value::Nil => builder,
            Value::List(items) => builder.items(items),
            other => builder.default(other),
        };
        self.add_argument(builder.build())
    }

    /// Add from a builder; a convenience for `add_argument(b.build())`.
    pub fn add_with(&mut self, builder: ArgumentBuilder) -> Result<Argument> {
        self.add_argument(builder.build())
    }

    /// Add several pre-built arguments in order.
    pub fn add_arguments(
        &mut self,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Result<()> {
        for argument in arguments {
            self.add_argument(argument)?;
        }
        Ok(())
    }

    /// Look up an argument by name.
    pub fn find(&self, name: &str) -> Result<Argument> {
        self.arguments
            .get(name)
            .map(|entry| entry.argument.clone())
            .ok_or_else(|| ArgformError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.values().map(|entry| &entry.argument)
    }

    /// Restore an argument to its default, firing the change chain.
    pub fn reset(&self, name: &str) -> Result<()> {
        self.find(name)?.reset()
    }

    /// Whether the reset affordance for `name` should currently be shown.
    pub fn reset_visible(&self, name: &str) -> Result<bool> {
        self.arguments
            .get(name)
            .map(|entry| entry.reset_visible.get())
            .ok_or_else(|| ArgformError::NotFound(name.to_string()))
    }

    /// Wipe all persisted values. Fails without a storage adapter.
    pub fn clear(&mut self) -> Result<()> {
        let storage = self.storage.as_mut().ok_or(ArgformError::NoStorage)?;
        info!("Clearing settings at {}", storage.describe());
        storage.clear()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Parser {
    type Item = &'a Argument;
    type IntoIter = Box<dyn Iterator<Item = &'a Argument> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("arguments", &self.arguments.keys().collect::<Vec<_>>())
            .field("storage", &self.storage.as_ref().map(|s| s.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStorage;
    use std::cell::RefCell;

    #[test]
    fn test_add_infers_kind_from_default() {
        let mut parser = Parser::new();
        let name = parser.add("name", "Marcus").unwrap();
        let age = parser.add("age", 33).unwrap();
        let height = parser.add("height", 1.87).unwrap();
        let alive = parser.add("alive", true).unwrap();
        let class = parser.add("class", vec!["Ranger", "Warrior"]).unwrap();
        let blank = parser.add("notes", ()).unwrap();

        assert_eq!(name.kind(), ArgKind::String);
        assert_eq!(age.kind(), ArgKind::Integer);
        assert_eq!(height.kind(), ArgKind::Float);
        assert_eq!(alive.kind(), ArgKind::Boolean);
        assert_eq!(class.kind(), ArgKind::Enum);
        assert_eq!(blank.kind(), ArgKind::String);

        assert_eq!(name.read().unwrap(), Value::Str("Marcus".into()));
        assert_eq!(age.read().unwrap(), Value::Int(33));
        assert_eq!(height.read().unwrap(), Value::Float(1.87));
        assert_eq!(alive.read().unwrap(), Value::Bool(true));
        assert_eq!(class.read().unwrap(), Value::Str("Ranger".into()));
    }

    #[test]
    fn test_duplicate_add_leaves_registry_unchanged() {
        let mut parser = Parser::new();
        parser.add("name", "Marcus").unwrap();
        assert_eq!(parser.len(), 1);

        match parser.add("name", 42) {
            Err(ArgformError::DuplicateName(name)) => assert_eq!(name, "name"),
            other => panic!("expected DuplicateName, got {:?}", other),
        }
        assert_eq!(parser.len(), 1);
        assert_eq!(
            parser.find("name").unwrap().read().unwrap(),
            Value::Str("Marcus".into())
        );
    }

    #[test]
    fn test_iteration_in_insertion_order() {
        let mut parser = Parser::new();
        for name in ["zebra", "apple", "monkey", "banana"] {
            parser.add(name, ()).unwrap();
        }
        let names: Vec<&str> = parser.iter().map(|arg| arg.name()).collect();
        assert_eq!(names, vec!["zebra", "apple", "monkey", "banana"]);
    }

    #[test]
    fn test_find_missing() {
        let parser = Parser::new();
        match parser.find("ghost") {
            Err(ArgformError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_signal_carries_argument() {
        let mut parser = Parser::new();
        parser.add("name", "Marcus").unwrap();
        parser.add("age", 33).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        parser
            .changed()
            .connect(move |arg: &Argument| log.borrow_mut().push(arg.name().to_string()));

        parser.find("age").unwrap().write(41).unwrap();
        parser.find("name").unwrap().write("Lena").unwrap();

        assert_eq!(*seen.borrow(), vec!["age".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_reset_affordance_tracks_edits() {
        let mut parser = Parser::new();
        parser.add("age", 33).unwrap();
        assert!(!parser.reset_visible("age").unwrap());

        parser.find("age").unwrap().write(41).unwrap();
        assert!(parser.reset_visible("age").unwrap());

        parser.reset("age").unwrap();
        assert!(!parser.reset_visible("age").unwrap());
        assert_eq!(parser.find("age").unwrap().read().unwrap(), Value::Int(33));
    }

    #[test]
    fn test_stored_value_overrides_default() {
        let storage = InMemoryStorage::new().with_value("name", Value::Str("Marcus".into()));
        let mut parser = Parser::with_storage(Box::new(storage));

        let name = parser.add("name", ()).unwrap();
        assert_eq!(name.read().unwrap(), Value::Str("Marcus".into()));
        assert_eq!(name.default(), Value::Str("Marcus".into()));
        assert!(!name.is_edited().unwrap());
    }

    #[test]
    fn test_stored_string_bool_coerces() {
        let storage = InMemoryStorage::new().with_value("alive", Value::Str("true".into()));
        let mut parser = Parser::with_storage(Box::new(storage));

        let alive = parser.add("alive", false).unwrap();
        assert_eq!(alive.read().unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_unusable_stored_value_is_ignored() {
        let storage = InMemoryStorage::new().with_value("age", Value::Str("not-a-number".into()));
        let mut parser = Parser::with_storage(Box::new(storage));

        let age = parser.add("age", 33).unwrap();
        assert_eq!(age.read().unwrap(), Value::Int(33));
    }

    #[test]
    fn test_clear_requires_storage() {
        let mut parser = Parser::new();
        match parser.clear() {
            Err(ArgformError::NoStorage) => {}
            other => panic!("expected NoStorage, got {:?}", other),
        }

        let storage = InMemoryStorage::new().with_value("name", Value::Str("Marcus".into()));
        let mut parser = Parser::with_storage(Box::new(storage));
        parser.clear().unwrap();
        let fresh = parser.add("name", ()).unwrap();
        assert_eq!(fresh.read().unwrap(), Value::Str("".into()));
    }

    #[test]
    fn test_range_argument_fails_to_bind() {
        let mut parser = Parser::new();
        let result = parser.add_with(ArgumentBuilder::new(ArgKind::Range, "exposure"));
        match result {
            Err(ArgformError::Unsupported(ArgKind::Range)) => {}
            other => panic!("expected Unsupported, got {:?}", other.map(|_| ())),
        }
        // The failed add left no trace.
        assert!(parser.is_empty());
    }

    #[test]
    fn test_handler_may_write_reentrantly() {
        let mut parser = Parser::new();
        parser.add("age", 33).unwrap();
        let echo = parser.add("ageEcho", "").unwrap();

        parser.changed().connect(move |arg: &Argument| {
            if arg.name() == "age" {
                let value = arg.read().unwrap();
                echo.write(value.to_string()).unwrap();
            }
        });

        parser.find("age").unwrap().write(41).unwrap();
        assert_eq!(
            parser.find("ageEcho").unwrap().read().unwrap(),
            Value::Str("41".into())
        );
        assert!(parser.reset_visible("ageEcho").unwrap());
    }
}
