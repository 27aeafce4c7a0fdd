//! Value bindings: the seam between an argument and whatever presents it.
//!
//! A presentation layer (a widget toolkit, a TUI, a test) implements
//! [`ValueBinding`] once per widget kind and hands it to
//! [`Argument::create`](crate::argument::Argument::create). The argument
//! never touches a widget directly; it only reads and writes through the
//! binding. This keeps the whole argument model headless.
//!
//! Two bindings ship with the crate:
//!
//! - [`MemoryBinding`]: stores the value in memory. The stand-in
//!   presentation for tests and non-GUI hosts, much as an in-memory store
//!   stands in for a file store.
//! - [`FixedBinding`]: a constant read value with writes ignored, for
//!   buttons (the `"clicked"` pseudo-value) and separators.

use std::cell::RefCell;

use crate::argument::{ArgKind, Argument};
use crate::error::{ArgformError, Result};
use crate::value::Value;

/// Read/write strategy bound to an argument at presentation time.
///
/// `read` pulls the currently displayed value, `write` pushes a new one.
/// Methods take `&self` so presentations can keep shared handles to the
/// same binding; implementations use interior mutability.
pub trait ValueBinding {
    fn read(&self) -> Value;
    fn write(&self, value: Value);
}

/// Closure type for binding arguments to a concrete presentation.
///
/// The parser calls the factory once per added argument that is not
/// already bound. The default factory is [`default_binding`].
pub type BindingFactory = Box<dyn Fn(&Argument) -> Result<Box<dyn ValueBinding>>>;

/// Headless binding that stores the value in memory.
#[derive(Debug, Default)]
pub struct MemoryBinding {
    slot: RefCell<Value>,
}

impl MemoryBinding {
    pub fn new(initial: Value) -> Self {
        Self {
            slot: RefCell::new(initial),
        }
    }
}

impl ValueBinding for MemoryBinding {
    fn read(&self) -> Value {
        self.slot.borrow().clone()
    }

    fn write(&self, value: Value) {
        *self.slot.borrow_mut() = value;
    }
}

/// Binding whose read value never changes and whose writes are discarded.
#[derive(Debug)]
pub struct FixedBinding {
    value: Value,
}

impl FixedBinding {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl ValueBinding for FixedBinding {
    fn read(&self) -> Value {
        self.value.clone()
    }

    fn write(&self, _value: Value) {}
}

/// Default per-kind binding factory.
///
/// Buttons always read `"clicked"`, separators always read `Nil`, and
/// every other supported kind gets a [`MemoryBinding`]. `Range` is
/// experimental and has no production binding; asking for one fails with
/// [`ArgformError::Unsupported`].
pub fn default_binding(argument: &Argument) -> Result<Box<dyn ValueBinding>> {
    match argument.kind() {
        ArgKind::Button => Ok(Box::new(FixedBinding::new(Value::Str("clicked".into())))),
        ArgKind::Separator => Ok(Box::new(FixedBinding::new(Value::Nil))),
        ArgKind::Range => Err(ArgformError::Unsupported(ArgKind::Range)),
        _ => Ok(Box::new(MemoryBinding::default())),
    }
}
