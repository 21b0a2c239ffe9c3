//! Graph - owns every cell of one invocation.
//!
//! Cells are registered once and then addressed either through their
//! typed handles or, type-erased, by name. The documentation lines kept
//! here are for humans and drift tests only; resolution never reads them.

use super::{Attribute, Handle};
use crate::error::{Error, Result};
use serde::Serialize;
use std::rc::Rc;

/// Name-addressable view of a cell, independent of its value type.
trait Cell {
    fn name(&self) -> &'static str;
    fn type_label(&self) -> &'static str;
    fn help(&self) -> &'static str;
    fn dependencies(&self) -> Vec<&'static str>;
    fn has_assigned_value(&self) -> bool;
    fn assign(&self, text: &str) -> Result<()>;
    fn value_string(&self) -> Result<Option<String>>;
    fn unwire(&self);
}

impl<T: Clone + 'static> Cell for Attribute<T> {
    fn name(&self) -> &'static str { Attribute::name(self) }
    fn type_label(&self) -> &'static str { Attribute::type_label(self) }
    fn help(&self) -> &'static str { Attribute::help(self) }
    fn dependencies(&self) -> Vec<&'static str> { Attribute::dependencies(self) }
    fn has_assigned_value(&self) -> bool { Attribute::has_assigned_value(self) }
    fn assign(&self, text: &str) -> Result<()> { Attribute::assign(self, text) }
    fn value_string(&self) -> Result<Option<String>> { Attribute::value_string(self) }
    fn unwire(&self) { Attribute::unwire(self) }
}

/// One row of [`Graph::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_label: &'static str,
    pub help: &'static str,
    pub inputs: Vec<&'static str>,
    pub assigned: bool,
}

#[derive(Default)]
pub struct Graph {
    cells: Vec<Rc<dyn Cell>>,
    derivations: Vec<String>,
}

impl Graph {
    pub fn new() -> Self { Self::default() }

    /// Take ownership of `cell` and return a handle for wiring.
    pub fn register<T: Clone + 'static>(&mut self, cell: Handle<T>) -> Handle<T> {
        debug_assert!(self.find(cell.name()).is_err(), "duplicate attribute '{}'", cell.name());
        self.cells.push(cell.clone());
        cell
    }

    /// Record a human-readable dependency/default line.
    pub fn document(&mut self, text: impl Into<String>) { self.derivations.push(text.into()); }

    pub fn derivations(&self) -> &[String] { &self.derivations }

    pub fn names(&self) -> Vec<&'static str> { self.cells.iter().map(|c| c.name()).collect() }

    pub fn describe(&self) -> Vec<AttributeInfo> {
        self.cells
            .iter()
            .map(|c| AttributeInfo {
                name: c.name(),
                type_label: c.type_label(),
                help: c.help(),
                inputs: c.dependencies(),
                assigned: c.has_assigned_value(),
            })
            .collect()
    }

    fn find(&self, name: &str) -> Result<&Rc<dyn Cell>> {
        self.cells
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool { self.find(name).is_ok() }

    pub fn assign(&self, name: &str, text: &str) -> Result<()> { self.find(name)?.assign(text) }

    pub fn has_assigned_value(&self, name: &str) -> Result<bool> { Ok(self.find(name)?.has_assigned_value()) }

    pub fn value_string(&self, name: &str) -> Result<Option<String>> { self.find(name)?.value_string() }
}

impl Drop for Graph {
    fn drop(&mut self) {
        for cell in &self.cells {
            cell.unwire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(name: &'static str) -> Handle<u32> {
        Attribute::<u32>::new(name, "INDEX", "a number", |v| v.to_string(), |s| s.parse().map_err(|_| Error::parse(s.to_string())))
    }

    fn wired() -> (Graph, Handle<u32>, Handle<u32>) {
        let mut graph = Graph::new();
        let base = graph.register(number("base"));
        let sum = graph.register(number("sum"));
        base.default_value(1);
        sum.derive_from(base.clone(), |base| Ok(Some(base.value()? + 10)));
        graph.document("base: default 1");
        graph.document("sum <- [base]");
        (graph, base, sum)
    }

    #[test]
    fn test_assign_and_query_by_name() {
        let (graph, _, sum) = wired();
        graph.assign("base", "5").unwrap();
        assert_eq!(graph.value_string("sum").unwrap().as_deref(), Some("15"));
        assert_eq!(sum.value().unwrap(), 15);
    }

    #[test]
    fn test_unknown_name() {
        let (graph, _, _) = wired();
        assert_eq!(graph.assign("nope", "1").unwrap_err(), Error::UnknownAttribute("nope".into()));
        assert!(graph.value_string("nope").is_err());
        assert!(!graph.contains("nope"));
    }

    #[test]
    fn test_describe_reports_inputs() {
        let (graph, _, _) = wired();
        let info = graph.describe();
        assert_eq!(info.len(), 2);
        assert_eq!(info[1].name, "sum");
        assert_eq!(info[1].inputs, vec!["base"]);
        assert!(info[0].inputs.is_empty());
        assert_eq!(graph.derivations().len(), 2);
    }

    #[test]
    fn test_describe_serializes() {
        let (graph, _, _) = wired();
        let json = serde_json::to_value(graph.describe()).unwrap();
        assert_eq!(json[1]["type"], "INDEX");
        assert_eq!(json[1]["inputs"][0], "base");
    }

    #[test]
    fn test_drop_unwires_rules() {
        let (graph, base, sum) = wired();
        drop(graph);
        // `sum`'s rule held the only other reference to `base`
        assert_eq!(Rc::strong_count(&base), 1);
        assert!(sum.dependencies().is_empty());
    }
}
