//! Per-execution name stores.

use serde::ser::{Serialize, Serializer};

use crate::keys;
use crate::value::{Map, Value, new_map};

/// Mutable name -> value store threaded through one execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    vars: Map,
}

impl Context {
    pub fn new() -> Self {
        Self { vars: new_map() }
    }

    /// Merge the top-level fields of an object input, then store the raw input under
    /// `input` (absent input is stored as `null`).
    pub fn seeded(input: Option<&Value>) -> Self {
        let mut ctx = Self::new();
        if let Some(Value::Object(fields)) = input {
            ctx.vars.reserve(fields.len() + 1);
            for (k, v) in fields {
                ctx.vars.insert(k.clone(), v.clone());
            }
        }
        ctx.set(keys::INPUT, input.cloned().unwrap_or(Value::Null));
        ctx
    }

    /// Value bound to `name`, `undefined` when unbound.
    pub fn get(&self, name: &str) -> Value {
        self.vars.get(name).cloned().unwrap_or(Value::Undefined)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// The model result if present, else the seeded input, else `null`.
    pub fn preferred_value(&self) -> Value {
        [keys::SORTED, keys::INPUT]
            .into_iter()
            .filter_map(|k| self.vars.get(k))
            .find(|v| !v.is_nullish())
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Value captured by `emit name`: the bound value unless it is nullish, else the
    /// preferred value.
    pub fn emit_value(&self, bound: Value) -> Value {
        if bound.is_nullish() {
            self.preferred_value()
        } else {
            bound
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    pub fn as_map(&self) -> &Map {
        &self.vars
    }

    pub fn into_map(self) -> Map {
        self.vars
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.vars.iter())
    }
}

/// Output name -> value, built as `%out` and `emit` execute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    values: Map,
}

impl Outputs {
    pub fn new() -> Self {
        Self { values: new_map() }
    }

    /// Store a deep copy of `value`; later context writes cannot reach it.
    pub fn emit(&mut self, name: impl Into<String>, value: &Value) {
        self.values.insert(name.into(), value.clone());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &Map {
        &self.values
    }

    pub fn into_map(self) -> Map {
        self.values
    }
}

impl Serialize for Outputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Value {
        Value::from_json(serde_json::json!({"x": 3, "input": "shadowed"}))
    }

    #[test]
    fn seeding_merges_fields_and_keeps_raw_input() {
        let raw = input();
        let ctx = Context::seeded(Some(&raw));
        assert_eq!(ctx.get("x"), Value::Number(3.0));
        assert_eq!(ctx.get("input"), raw);
        assert_eq!(ctx.get("missing"), Value::Undefined);
    }

    #[test]
    fn array_input_is_not_merged() {
        let raw = Value::List(vec![Value::Number(1.0)]);
        let ctx = Context::seeded(Some(&raw));
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.preferred_value(), raw);
    }

    #[test]
    fn preferred_value_order() {
        let mut ctx = Context::seeded(None);
        assert_eq!(ctx.preferred_value(), Value::Null);
        ctx.set("input", Value::str("raw"));
        assert_eq!(ctx.preferred_value(), Value::str("raw"));
        ctx.set("sorted", Value::List(vec![]));
        assert_eq!(ctx.preferred_value(), Value::List(vec![]));
    }

    #[test]
    fn emitted_values_are_detached() {
        let mut ctx = Context::new();
        let mut out = Outputs::new();
        ctx.set("a", Value::List(vec![Value::Number(1.0)]));
        out.emit("a", &ctx.get("a"));
        ctx.set("a", Value::Null);
        assert_eq!(out.get("a"), Some(&Value::List(vec![Value::Number(1.0)])));
    }
}
