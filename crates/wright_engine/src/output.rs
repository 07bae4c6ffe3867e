//! Resource inputs and references to the outputs of other resources.
//!
//! A resource argument is either a literal value known while the program runs,
//! or a reference to a property another resource will only produce once the
//! engine has created it. References are serialized as a tagged object
//! (`{"$ref": "firewall.id"}`) so engines can tell them apart from literals and
//! rewrite them into their own expression syntax.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Key marking a serialized output reference.
pub const REF_KEY: &str = "$ref";

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field access (`.name`).
    Field(String),
    /// List index (`[0]`).
    Index(usize),
    /// Map key lookup (`["kubeconfig"]`).
    Key(String),
}

/// Reference to a property of a declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputRef {
    resource: String,
    path: Vec<PathSegment>,
}

impl OutputRef {
    /// Reference the resource itself.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            path: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.path.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.path.push(PathSegment::Key(key.into()));
        self
    }

    /// Logical name of the referenced resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Render the reference as an engine expression, e.g. `cluster.kubeConfigs[0].rawConfig`.
    pub fn expression(&self) -> String {
        let mut expr = self.resource.clone();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    expr.push('.');
                    expr.push_str(name);
                }
                PathSegment::Index(index) => expr.push_str(&format!("[{}]", index)),
                PathSegment::Key(key) => {
                    expr.push_str(&format!("[{}]", Value::String(key.clone())));
                }
            }
        }
        expr
    }

    /// Tagged JSON form of the reference.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(REF_KEY.to_string(), Value::String(self.expression()));
        Value::Object(map)
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression())
    }
}

impl Serialize for OutputRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(REF_KEY, &self.expression())?;
        map.end()
    }
}

/// A resource argument: a literal value or a reference to another resource's output.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Value(T),
    Output(OutputRef),
}

impl<T> Input<T> {
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Input::Value(value) => Some(value),
            Input::Output(_) => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputRef> {
        match self {
            Input::Value(_) => None,
            Input::Output(output) => Some(output),
        }
    }
}

impl<T: Default> Default for Input<T> {
    fn default() -> Self {
        Input::Value(T::default())
    }
}

impl<T: Serialize> Serialize for Input<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Input::Value(value) => value.serialize(serializer),
            Input::Output(output) => output.serialize(serializer),
        }
    }
}

impl<T> From<OutputRef> for Input<T> {
    fn from(output: OutputRef) -> Self {
        Input::Output(output)
    }
}

impl<T> From<&OutputRef> for Input<T> {
    fn from(output: &OutputRef) -> Self {
        Input::Output(output.clone())
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<bool> for Input<bool> {
    fn from(value: bool) -> Self {
        Input::Value(value)
    }
}

impl From<i32> for Input<i32> {
    fn from(value: i32) -> Self {
        Input::Value(value)
    }
}

/// Extract the expression of a tagged reference object.
pub fn as_reference(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) if map.len() == 1 => map.get(REF_KEY).and_then(Value::as_str),
        _ => None,
    }
}

/// Logical resource name an expression starts from.
pub fn expression_resource(expression: &str) -> &str {
    expression
        .split(|c| c == '.' || c == '[')
        .next()
        .unwrap_or(expression)
}

/// Collect the names of all resources referenced anywhere in `value`.
pub fn referenced_resources(value: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_references(value, &mut names);
    names
}

fn collect_references(value: &Value, names: &mut BTreeSet<String>) {
    if let Some(expression) = as_reference(value) {
        names.insert(expression_resource(expression).to_string());
        return;
    }
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_references(item, names)),
        Value::Object(map) => map.values().for_each(|item| collect_references(item, names)),
        _ => {}
    }
}

/// Rewrite references into `${...}` interpolations and escape literal `${` sequences.
pub fn interpolate(value: &Value) -> Value {
    if let Some(expression) = as_reference(value) {
        return Value::String(format!("${{{}}}", expression));
    }
    match value {
        Value::String(s) => Value::String(s.replace("${", "$${")),
        Value::Array(items) => Value::Array(items.iter().map(interpolate).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), interpolate(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}
