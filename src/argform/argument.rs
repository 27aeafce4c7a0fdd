//! # The Argument Model
//!
//! An [`Argument`] is a single named, typed, user-editable parameter: a
//! checkbox, a spin box, a combo box entry, a button. It owns its metadata
//! (label, help, default, items, bounds) but never its presentation — the
//! current value lives behind a [`ValueBinding`] installed by
//! [`Argument::create`], and every read or write goes through it.
//!
//! ## Kinds
//!
//! The set of argument kinds is closed — see [`ArgKind`]. Behavior that
//! differs per kind (value domains, write coercion, the Enum fallback
//! quirk) is dispatched on the enum rather than on open-ended subtypes.
//!
//! ## Change notification
//!
//! `write` emits the argument's `changed` signal after pushing the value to
//! the binding. Every write emits, even when the value did not actually
//! change, with one exception: string-like kinds (String, Info, Color) only
//! emit when the read-back value differs from the last observed one. Text
//! widgets fire their finish-editing trigger on focus loss whether or not
//! an edit happened, and without the dedup every focus change would look
//! like an edit.
//!
//! ## Cloning and equality
//!
//! `Argument` is a cheap handle (`Rc` inner); clones observe the same
//! state. Two arguments are equal iff their names are equal, and an
//! argument compares equal to its name as a plain string.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use heck::ToTitleCase;
use log::warn;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::binding::ValueBinding;
use crate::error::{ArgformError, Result};
use crate::signal::Signal;
use crate::value::Value;

/// The closed set of argument kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Boolean,
    Tristate,
    Integer,
    Float,
    /// Experimental; has no production binding.
    Range,
    String,
    /// Read-only string display.
    Info,
    /// Behaves as String for now.
    Color,
    Button,
    Toggle,
    Separator,
    Enum,
    Choice,
    Double3,
    /// Read-only list display. Experimental.
    InfoList,
}

impl ArgKind {
    /// Infer a kind from a default value, for add-by-name.
    pub fn infer(default: &Value) -> ArgKind {
        match default {
            Value::Nil => ArgKind::String,
            Value::Bool(_) => ArgKind::Boolean,
            Value::Int(_) => ArgKind::Integer,
            Value::Float(_) => ArgKind::Float,
            Value::Str(_) => ArgKind::String,
            Value::List(_) => ArgKind::Enum,
            Value::Float3(_) => ArgKind::Double3,
        }
    }

    /// String, Info and Color share the text-widget emission dedup.
    pub fn is_string_like(self) -> bool {
        matches!(self, ArgKind::String | ArgKind::Info | ArgKind::Color)
    }

    /// Class-level default used when the caller supplies none.
    fn implicit_default(self, items: &[String]) -> Value {
        match self {
            ArgKind::Boolean | ArgKind::Toggle => Value::Bool(false),
            ArgKind::Tristate => Value::Int(0),
            ArgKind::Integer => Value::Int(0),
            ArgKind::Float | ArgKind::Range => Value::Float(0.0),
            ArgKind::String | ArgKind::Info | ArgKind::Color => Value::Str(String::new()),
            ArgKind::Enum | ArgKind::Choice => items
                .first()
                .map(|item| Value::Str(item.clone()))
                .unwrap_or(Value::Nil),
            ArgKind::Double3 => Value::Float3([0.0; 3]),
            ArgKind::InfoList => Value::List(items.to_vec()),
            ArgKind::Button | ArgKind::Separator => Value::Nil,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Boolean => "Boolean",
            ArgKind::Tristate => "Tristate",
            ArgKind::Integer => "Integer",
            ArgKind::Float => "Float",
            ArgKind::Range => "Range",
            ArgKind::String => "String",
            ArgKind::Info => "Info",
            ArgKind::Color => "Color",
            ArgKind::Button => "Button",
            ArgKind::Toggle => "Toggle",
            ArgKind::Separator => "Separator",
            ArgKind::Enum => "Enum",
            ArgKind::Choice => "Choice",
            ArgKind::Double3 => "Double3",
            ArgKind::InfoList => "InfoList",
        };
        write!(f, "{}", name)
    }
}

/// Convert a camelCase name to a Title Case label.
///
/// `"maxInfluences"` becomes `"Max Influences"`, `"you"` becomes `"You"`,
/// `"This is That"` becomes `"This Is That"`.
pub fn camel_to_title(name: &str) -> String {
    name.to_title_case()
}

/// Checkbox-state table: how loosely typed stored values map onto a
/// checked/unchecked state. Settings backends that serialize to text hand
/// back strings, so the string spellings are accepted too.
static CHECK_STATES: Lazy<HashMap<&'static str, bool>> = Lazy::new(|| {
    HashMap::from([
        ("false", false),
        ("0", false),
        ("true", true),
        ("1", true),
        ("2", true), // fully checked tristate
    ])
});

struct ArgumentInner {
    name: String,
    kind: ArgKind,
    label: String,
    help: String,
    items: Vec<String>,
    min: f64,
    max: f64,
    enabled: Cell<bool>,
    default: RefCell<Value>,
    binding: RefCell<Option<Box<dyn ValueBinding>>>,
    /// Last value an emission reported, for the string-like dedup.
    last_seen: RefCell<Value>,
    changed: Signal<Argument>,
}

/// A single named, typed parameter. See the module docs.
#[derive(Clone)]
pub struct Argument {
    inner: Rc<ArgumentInner>,
}

/// Typed construction for [`Argument`].
///
/// Unknown settings cannot be expressed: the fields below are the whole
/// construction surface.
pub struct ArgumentBuilder {
    name: String,
    kind: ArgKind,
    label: Option<String>,
    help: String,
    items: Vec<String>,
    min: f64,
    max: f64,
    enabled: bool,
    default: Option<Value>,
}

impl ArgumentBuilder {
    pub fn new(kind: ArgKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            help: String::new(),
            items: Vec::new(),
            min: 0.0,
            max: 99.0,
            enabled: true,
            default: None,
        }
    }

    /// Explicit display label; otherwise derived from the name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Tooltip/description text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Choices for Enum, Choice and InfoList kinds.
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn min(mut self, min: impl Into<f64>) -> Self {
        self.min = min.into();
        self
    }

    pub fn max(mut self, max: impl Into<f64>) -> Self {
        self.max = max.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn build(self) -> Argument {
        let mut items = self.items;
        if items.is_empty() && matches!(self.kind, ArgKind::Enum | ArgKind::Choice) {
            items.push("No items".to_string());
        }

        let default = match self.default {
            Some(value) => resolve_default(self.kind, value, &items),
            None => self.kind.implicit_default(&items),
        };

        let label = self
            .label
            .unwrap_or_else(|| camel_to_title(&self.name));

        Argument {
            inner: Rc::new(ArgumentInner {
                name: self.name,
                kind: self.kind,
                label,
                help: self.help,
                items,
                min: self.min,
                max: self.max,
                enabled: Cell::new(self.enabled),
                default: RefCell::new(default),
                binding: RefCell::new(None),
                last_seen: RefCell::new(Value::Nil),
                changed: Signal::new(),
            }),
        }
    }
}

/// Resolve an explicit construction default to the kind's value domain.
///
/// Enum/Choice integer defaults select the item at that index, clamped to
/// index 0 when out of range. A string default that is not among the items
/// is kept as-is; the Enum write path falls back to item 0 later (the
/// documented quirk), and Choice rejects it on write.
fn resolve_default(kind: ArgKind, value: Value, items: &[String]) -> Value {
    match kind {
        ArgKind::Enum | ArgKind::Choice => match value {
            Value::Int(index) => {
                let index = usize::try_from(index)
                    .ok()
                    .filter(|i| *i < items.len())
                    .unwrap_or(0);
                items
                    .get(index)
                    .map(|item| Value::Str(item.clone()))
                    .unwrap_or(Value::Nil)
            }
            other => other,
        },
        _ => coerce_stored(kind, value.clone(), items).unwrap_or(value),
    }
}

/// Coerce a loosely typed value (usually from a persistence adapter) into
/// the kind's value domain. `None` means the value is unusable for this
/// kind.
pub(crate) fn coerce_stored(kind: ArgKind, value: Value, items: &[String]) -> Option<Value> {
    match kind {
        ArgKind::Boolean | ArgKind::Toggle => match value {
            Value::Bool(b) => Some(Value::Bool(b)),
            Value::Int(i) => Some(Value::Bool(i != 0)),
            Value::Str(s) => CHECK_STATES.get(s.as_str()).map(|b| Value::Bool(*b)),
            _ => None,
        },
        ArgKind::Tristate => match value {
            Value::Int(i) if (0..=2).contains(&i) => Some(Value::Int(i)),
            Value::Str(s) => match s.as_str() {
                "0" | "1" | "2" => s.parse().ok().map(Value::Int),
                _ => None,
            },
            _ => None,
        },
        ArgKind::Integer => match value {
            Value::Int(i) => Some(Value::Int(i)),
            Value::Float(f) => Some(Value::Int(f as i64)),
            Value::Str(s) => s
                .parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .map(Value::Int),
            _ => None,
        },
        ArgKind::Float | ArgKind::Range => match value {
            Value::Float(f) => Some(Value::Float(f)),
            Value::Int(i) => Some(Value::Float(i as f64)),
            Value::Str(s) => s.parse().ok().map(Value::Float),
            _ => None,
        },
        ArgKind::String | ArgKind::Info | ArgKind::Color => match value {
            Value::Str(s) => Some(Value::Str(s)),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                Some(Value::Str(value.to_string()))
            }
            _ => None,
        },
        ArgKind::Enum => match value {
            Value::Str(s) => Some(Value::Str(s)),
            Value::Int(index) => {
                let index = usize::try_from(index).ok().filter(|i| *i < items.len())?;
                Some(Value::Str(items[index].clone()))
            }
            _ => None,
        },
        ArgKind::Choice => match value {
            Value::Str(s) if items.iter().any(|item| *item == s) => Some(Value::Str(s)),
            Value::Int(index) => {
                let index = usize::try_from(index).ok().filter(|i| *i < items.len())?;
                Some(Value::Str(items[index].clone()))
            }
            _ => None,
        },
        ArgKind::Double3 => match value {
            Value::Float3(v) => Some(Value::Float3(v)),
            _ => None,
        },
        ArgKind::InfoList => match value {
            Value::List(l) => Some(Value::List(l)),
            _ => None,
        },
        ArgKind::Button | ArgKind::Separator => None,
    }
}

impl Argument {
    // Builder shorthands, one per kind a caller would construct directly.

    pub fn boolean(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Boolean, name)
    }

    pub fn tristate(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Tristate, name)
    }

    pub fn integer(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Integer, name)
    }

    pub fn float(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Float, name)
    }

    pub fn string(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::String, name)
    }

    pub fn info(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Info, name)
    }

    pub fn button(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Button, name)
    }

    pub fn toggle(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Toggle, name)
    }

    pub fn separator(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Separator, name)
    }

    pub fn enumeration(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Enum, name)
    }

    pub fn choice(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Choice, name)
    }

    pub fn double3(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(ArgKind::Double3, name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn kind(&self) -> ArgKind {
        self.inner.kind
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn help(&self) -> &str {
        &self.inner.help
    }

    pub fn items(&self) -> &[String] {
        &self.inner.items
    }

    pub fn min(&self) -> f64 {
        self.inner.min
    }

    pub fn max(&self) -> f64 {
        self.inner.max
    }

    pub fn enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// The value restored on [`reset`](Self::reset).
    pub fn default(&self) -> Value {
        self.inner.default.borrow().clone()
    }

    /// Replace the default, as the parser does with a persisted override.
    pub(crate) fn set_default(&self, default: Value) {
        *self.inner.default.borrow_mut() = default;
    }

    /// Per-argument change signal; the payload is the argument itself.
    pub fn changed(&self) -> &Signal<Argument> {
        &self.inner.changed
    }

    pub fn is_bound(&self) -> bool {
        self.inner.binding.borrow().is_some()
    }

    /// Bind a presentation and seed it with the default value.
    ///
    /// Seeding does not emit `changed`; nothing was edited yet. Rebinding
    /// replaces any previous binding.
    pub fn create(&self, binding: Box<dyn ValueBinding>) -> Result<()> {
        let default = self.default();
        if !default.is_nil() {
            binding.write(default);
        }
        *self.inner.last_seen.borrow_mut() = binding.read();
        *self.inner.binding.borrow_mut() = Some(binding);
        Ok(())
    }

    /// Current value, pulled from the bound presentation.
    pub fn read(&self) -> Result<Value> {
        let binding = self.inner.binding.borrow();
        let binding = binding
            .as_ref()
            .ok_or_else(|| ArgformError::Unbound(self.inner.name.clone()))?;
        Ok(self.normalize_read(binding.read()))
    }

    /// Push a value to the bound presentation and emit `changed`.
    ///
    /// The value is validated and coerced per kind first; see the module
    /// docs for the emission rules.
    pub fn write(&self, value: impl Into<Value>) -> Result<()> {
        let resolved = self.resolve_write(value.into())?;
        {
            let binding = self.inner.binding.borrow();
            let binding = binding
                .as_ref()
                .ok_or_else(|| ArgformError::Unbound(self.inner.name.clone()))?;
            binding.write(resolved);
        }

        if self.inner.kind.is_string_like() {
            let now = self.read()?;
            if now == *self.inner.last_seen.borrow() {
                return Ok(());
            }
            *self.inner.last_seen.borrow_mut() = now;
        }

        // No borrows held here; handlers may write again re-entrantly.
        self.inner.changed.emit(&self.clone());
        Ok(())
    }

    /// Restore the default value, firing the usual change chain.
    pub fn reset(&self) -> Result<()> {
        self.write(self.default())
    }

    /// True when the current value differs from the default.
    pub fn is_edited(&self) -> Result<bool> {
        Ok(self.read()? != self.default())
    }

    /// Generic metadata view, for introspection-driven hosts.
    ///
    /// Keys: name, label, default, help, items, min, max, enabled, edited.
    pub fn field(&self, key: &str) -> Result<Value> {
        match key {
            "name" => Ok(Value::Str(self.inner.name.clone())),
            "label" => Ok(Value::Str(self.inner.label.clone())),
            "default" => Ok(self.default()),
            "help" => Ok(Value::Str(self.inner.help.clone())),
            "items" => Ok(Value::List(self.inner.items.clone())),
            "min" => Ok(Value::Float(self.inner.min)),
            "max" => Ok(Value::Float(self.inner.max)),
            "enabled" => Ok(Value::Bool(self.enabled())),
            "edited" => Ok(Value::Bool(self.is_edited().unwrap_or(false))),
            _ => Err(ArgformError::UnknownField {
                name: self.inner.name.clone(),
                key: key.to_string(),
            }),
        }
    }

    fn incompatible(&self, value: Value) -> ArgformError {
        ArgformError::Incompatible {
            name: self.inner.name.clone(),
            kind: self.inner.kind,
            shape: value.type_name(),
            value,
        }
    }

    /// Per-kind write validation and coercion.
    fn resolve_write(&self, value: Value) -> Result<Value> {
        let items = &self.inner.items;
        match self.inner.kind {
            ArgKind::Boolean | ArgKind::Toggle => match &value {
                Value::Bool(_) => Ok(value),
                Value::Int(i @ (0 | 1)) => Ok(Value::Bool(*i == 1)),
                Value::Str(s) => CHECK_STATES
                    .get(s.as_str())
                    .map(|b| Value::Bool(*b))
                    .ok_or_else(|| self.incompatible(value.clone())),
                _ => Err(self.incompatible(value)),
            },
            ArgKind::Tristate => match &value {
                Value::Int(i) if (0..=2).contains(i) => Ok(value),
                Value::Str(s) => match s.as_str() {
                    "0" => Ok(Value::Int(0)),
                    "1" => Ok(Value::Int(1)),
                    "2" => Ok(Value::Int(2)),
                    _ => Err(self.incompatible(value.clone())),
                },
                _ => Err(self.incompatible(value)),
            },
            ArgKind::Integer => match &value {
                Value::Int(_) => Ok(value),
                Value::Float(f) => Ok(Value::Int(*f as i64)),
                Value::Str(s) => s
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| self.incompatible(value.clone())),
                _ => Err(self.incompatible(value)),
            },
            ArgKind::Float | ArgKind::Range => match &value {
                Value::Float(_) => Ok(value),
                Value::Int(i) => Ok(Value::Float(*i as f64)),
                Value::Str(s) => s
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.incompatible(value.clone())),
                _ => Err(self.incompatible(value)),
            },
            ArgKind::String | ArgKind::Info | ArgKind::Color => match value {
                Value::Str(_) => Ok(value),
                other => Err(self.incompatible(other)),
            },
            ArgKind::Enum => match &value {
                Value::Str(s) => {
                    if items.iter().any(|item| item == s) {
                        Ok(value)
                    } else {
                        // Historical quirk: an unknown item falls back to
                        // index 0 rather than failing, unlike Choice.
                        warn!(
                            "'{}' is not an item of enum '{}'; falling back to '{}'",
                            s, self.inner.name, items[0]
                        );
                        Ok(Value::Str(items[0].clone()))
                    }
                }
                Value::Int(index) => {
                    let index = usize::try_from(*index)
                        .ok()
                        .filter(|i| *i < items.len())
                        .unwrap_or_else(|| {
                            warn!(
                                "index {} is out of range for enum '{}'; falling back to 0",
                                index, self.inner.name
                            );
                            0
                        });
                    Ok(Value::Str(items[index].clone()))
                }
                _ => Err(self.incompatible(value)),
            },
            ArgKind::Choice => match &value {
                Value::Str(s) => {
                    if items.iter().any(|item| item == s) {
                        Ok(value)
                    } else {
                        Err(ArgformError::NotAnItem {
                            name: self.inner.name.clone(),
                            value: s.clone(),
                        })
                    }
                }
                Value::Int(index) => usize::try_from(*index)
                    .ok()
                    .filter(|i| *i < items.len())
                    .map(|i| Value::Str(items[i].clone()))
                    .ok_or_else(|| ArgformError::NotAnItem {
                        name: self.inner.name.clone(),
                        value: index.to_string(),
                    }),
                _ => Err(self.incompatible(value)),
            },
            // The value carries no state; the binding discards it but the
            // write still counts as a programmatic activation.
            ArgKind::Button | ArgKind::Separator => Ok(Value::Nil),
            ArgKind::Double3 => match value {
                Value::Float3(_) => Ok(value),
                other => Err(self.incompatible(other)),
            },
            ArgKind::InfoList => match value {
                Value::List(_) => Ok(value),
                other => Err(self.incompatible(other)),
            },
        }
    }

    /// Light normalization of what a binding hands back, so callers see
    /// the kind's canonical value shape regardless of the widget behind it.
    fn normalize_read(&self, value: Value) -> Value {
        match self.inner.kind {
            ArgKind::Separator => Value::Nil,
            ArgKind::Boolean | ArgKind::Toggle => match value {
                Value::Int(i) => Value::Bool(i != 0),
                other => other,
            },
            ArgKind::Integer => match value {
                Value::Float(f) => Value::Int(f as i64),
                other => other,
            },
            ArgKind::Float | ArgKind::Range => match value {
                Value::Int(i) => Value::Float(i as f64),
                other => other,
            },
            _ => value,
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for Argument {}

impl PartialEq<str> for Argument {
    fn eq(&self, other: &str) -> bool {
        self.inner.name == other
    }
}

impl PartialEq<&str> for Argument {
    fn eq(&self, other: &&str) -> bool {
        self.inner.name == *other
    }
}

impl PartialEq<String> for Argument {
    fn eq(&self, other: &String) -> bool {
        self.inner.name == *other
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .field("default", &*self.inner.default.borrow())
            .field("bound", &self.is_bound())
            .finish()
    }
}
