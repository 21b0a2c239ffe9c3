//! Attribute - lazy, memoizing value cells.
//!
//! An [`Attribute`] holds an optional assigned value and an optional
//! derivation rule. Queries pull: the assigned value wins, otherwise the
//! rule runs once and its outcome is cached for the rest of the graph's
//! lifetime.
//!
//! ```text
//!              assign(text)
//!   ┌───────────────┴───────────────┐
//!   │ assigned: Some(v)  ──────────────▶ value() = v
//!   │ assigned: None                │
//!   │   Unresolved ──rule──▶ Resolving ──▶ Resolved(v) | Empty | Failed(e)
//!   │                          │
//!   │                          └── re-entered ──▶ Error::Cycle
//!   └───────────────────────────────┘
//! ```
//!
//! Rules receive read-only handles to exactly the cells they declare as
//! [`Inputs`], so the dependency set of every cell is inspectable.

pub mod graph;
mod inputs;

pub use graph::{AttributeInfo, Graph};
pub use inputs::Inputs;

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::str::FromStr;

/// Shared, graph-owned reference to a cell.
pub type Handle<T> = Rc<Attribute<T>>;

enum Resolution<T> {
    Unresolved,
    Resolving,
    Empty,
    Resolved(T),
    Failed(Error),
}

struct Rule<T> {
    inputs: Vec<&'static str>,
    eval: Box<dyn Fn() -> Result<Option<T>>>,
}

/// Text codec for one value type. `decode` is `None` for output-only cells.
struct Codec<T> {
    encode: fn(&T) -> String,
    decode: Option<fn(&str) -> Result<T>>,
}

pub struct Attribute<T> {
    name: &'static str,
    type_label: &'static str,
    help: &'static str,
    codec: Codec<T>,
    assigned: RefCell<Option<T>>,
    state: RefCell<Resolution<T>>,
    rule: RefCell<Option<Rule<T>>>,
}

fn display<T: Display>(value: &T) -> String { value.to_string() }

fn parse<T: FromStr<Err = Error>>(text: &str) -> Result<T> { text.parse() }

impl<T: Clone + 'static> Attribute<T> {
    pub fn new(
        name: &'static str,
        type_label: &'static str,
        help: &'static str,
        encode: fn(&T) -> String,
        decode: fn(&str) -> Result<T>,
    ) -> Handle<T> {
        Self::build(name, type_label, help, Codec { encode, decode: Some(decode) })
    }

    /// A cell that can be queried but never assigned.
    pub fn output_only(name: &'static str, type_label: &'static str, help: &'static str, encode: fn(&T) -> String) -> Handle<T> {
        Self::build(name, type_label, help, Codec { encode, decode: None })
    }

    fn build(name: &'static str, type_label: &'static str, help: &'static str, codec: Codec<T>) -> Handle<T> {
        Rc::new(Self {
            name,
            type_label,
            help,
            codec,
            assigned: RefCell::new(None),
            state: RefCell::new(Resolution::Unresolved),
            rule: RefCell::new(None),
        })
    }

    pub fn name(&self) -> &'static str { self.name }
    pub fn type_label(&self) -> &'static str { self.type_label }
    pub fn help(&self) -> &'static str { self.help }

    /// Names of the cells this cell's rule reads. Empty for inputs and constant defaults.
    pub fn dependencies(&self) -> Vec<&'static str> {
        self.rule.borrow().as_ref().map(|r| r.inputs.clone()).unwrap_or_default()
    }

    /// Install the derivation rule. `eval` sees only `inputs`.
    pub fn derive_from<I, F>(&self, inputs: I, eval: F)
    where
        I: Inputs + 'static,
        F: Fn(&I) -> Result<Option<T>> + 'static,
    {
        let names = inputs.names();
        *self.rule.borrow_mut() = Some(Rule { inputs: names, eval: Box::new(move || eval(&inputs)) });
    }

    /// Rule with no inputs that always yields `value`.
    pub fn default_value(&self, value: T) {
        self.derive_from((), move |_| Ok(Some(value.clone())));
    }

    /// Drop the rule and the handles it captured.
    pub fn unwire(&self) { self.rule.borrow_mut().take(); }

    /// Parse `text` and store it as the assigned value.
    pub fn assign(&self, text: &str) -> Result<()> {
        let value = self.from_string(text)?;
        self.set(value);
        Ok(())
    }

    pub fn set(&self, value: T) {
        tracing::debug!("{}: assigned", self.name);
        *self.assigned.borrow_mut() = Some(value);
    }

    pub fn has_assigned_value(&self) -> bool { self.assigned.borrow().is_some() }

    /// The assigned value alone; never runs the rule.
    pub fn assigned_value(&self) -> Option<T> { self.assigned.borrow().clone() }

    /// Whether a value is obtainable. May run the rule, and its errors propagate.
    pub fn has_value(&self) -> Result<bool> { Ok(self.optional_value()?.is_some()) }

    pub fn value(&self) -> Result<T> {
        self.optional_value()?
            .ok_or_else(|| Error::Logic(format!("'{}' has no value: not assigned and nothing to derive it from", self.name)))
    }

    pub fn optional_value(&self) -> Result<Option<T>> {
        if let Some(value) = self.assigned.borrow().as_ref() {
            return Ok(Some(value.clone()));
        }
        self.resolve()
    }

    pub fn to_string(&self, value: &T) -> String { (self.codec.encode)(value) }

    pub fn from_string(&self, text: &str) -> Result<T> {
        let decode = self.codec.decode.ok_or_else(|| Error::Logic(format!("'{}' is output only", self.name)))?;
        decode(text)
    }

    /// Text form of the current value, if any.
    pub fn value_string(&self) -> Result<Option<String>> {
        Ok(self.optional_value()?.map(|v| self.to_string(&v)))
    }

    fn resolve(&self) -> Result<Option<T>> {
        match &*self.state.borrow() {
            Resolution::Unresolved => {}
            Resolution::Resolved(value) => {
                tracing::trace!("{}: cached", self.name);
                return Ok(Some(value.clone()));
            }
            Resolution::Empty => return Ok(None),
            Resolution::Failed(err) => return Err(err.clone()),
            Resolution::Resolving => {
                tracing::warn!("{}: re-entered while resolving", self.name);
                return Err(Error::Cycle(self.name.to_string()));
            }
        }

        let rule = self.rule.borrow();
        let Some(rule) = rule.as_ref() else {
            return Ok(None);
        };

        *self.state.borrow_mut() = Resolution::Resolving;
        tracing::debug!("{}: resolving from {:?}", self.name, rule.inputs);
        let outcome = (rule.eval)();
        *self.state.borrow_mut() = match &outcome {
            Ok(Some(value)) => Resolution::Resolved(value.clone()),
            Ok(None) => Resolution::Empty,
            Err(err) => {
                tracing::debug!("{}: failed: {}", self.name, err);
                Resolution::Failed(err.clone())
            }
        };
        outcome
    }
}

impl<T: Clone + Display + FromStr<Err = Error> + 'static> Attribute<T> {
    /// Cell whose text codec is the type's own `Display`/`FromStr`.
    pub fn textual(name: &'static str, type_label: &'static str, help: &'static str) -> Handle<T> {
        Self::new(name, type_label, help, display::<T>, parse::<T>)
    }
}
