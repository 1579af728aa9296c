//! Typed configuration tree built from a decoded TOML table.
//!
//! Every value of the source table is classified by type into one of four
//! maps: booleans, integers, strings and nested trees. Anything else (floats,
//! datetimes, arrays) is kept as its textual form in the string map, and a
//! warning naming the key, value and type goes to the diagnostic sink.
//!
//! The per-type accessors ([`ConfigTree::bool_default`],
//! [`ConfigTree::int_default`], [`ConfigTree::string_default`]) never fail
//! outright: they always return the best value available, paired with the
//! error that forced a fallback, if any.

use std::collections::BTreeMap;

use serde::Serialize;
use toml::{Table, Value};

use crate::bounds::BoundedInt;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::envref;
use crate::error::FlagfigError;

/// A resolved value and the error, if any, that made it fall back.
pub type Resolved<T> = (T, Option<FlagfigError>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigTree {
    bools: BTreeMap<String, bool>,
    ints: BTreeMap<String, i64>,
    strings: BTreeMap<String, String>,
    trees: BTreeMap<String, ConfigTree>,
}

impl ConfigTree {
    /// An empty tree: all four maps present, none populated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `table`, reporting coerced values through [`LogSink`].
    pub fn new(table: &Table) -> Self {
        Self::with_sink(table, &mut LogSink)
    }

    /// Build from `table`, reporting coerced values to `sink`.
    pub fn with_sink(table: &Table, sink: &mut dyn DiagnosticSink) -> Self {
        Self::build(table, "", sink)
    }

    fn build(table: &Table, prefix: &str, sink: &mut dyn DiagnosticSink) -> Self {
        let mut tree = Self::empty();
        for (key, value) in table {
            match value {
                Value::Boolean(b) => {
                    tree.bools.insert(key.clone(), *b);
                }
                Value::Integer(i) => {
                    tree.ints.insert(key.clone(), *i);
                }
                Value::String(s) => {
                    tree.strings.insert(key.clone(), s.clone());
                }
                Value::Table(sub) => {
                    let path = dotted(prefix, key);
                    tree.trees.insert(key.clone(), Self::build(sub, &path, sink));
                }
                other => {
                    let text = coerce_to_text(other);
                    sink.emit(
                        Diagnostic::warning(
                            "flagfig.tree.value_coerced",
                            format!(
                                "config key '{}' has unsupported {} value {text}; using it as a string",
                                dotted(prefix, key),
                                other.type_str()
                            ),
                        )
                        .field("key", key)
                        .field("path", dotted(prefix, key))
                        .field("value", &text)
                        .field("type", other.type_str()),
                    );
                    tree.strings.insert(key.clone(), text);
                }
            }
        }
        tree
    }

    pub fn bools(&self) -> &BTreeMap<String, bool> {
        &self.bools
    }

    pub fn ints(&self) -> &BTreeMap<String, i64> {
        &self.ints
    }

    pub fn strings(&self) -> &BTreeMap<String, String> {
        &self.strings
    }

    pub fn trees(&self) -> &BTreeMap<String, ConfigTree> {
        &self.trees
    }

    pub fn is_empty(&self) -> bool {
        self.bools.is_empty()
            && self.ints.is_empty()
            && self.strings.is_empty()
            && self.trees.is_empty()
    }

    /// Resolve a boolean for `key`.
    ///
    /// Looks in the boolean map, then the integer map (`0` and `1` only), then
    /// the string map (dereferenced, then parsed as `t`/`true`/`f`/`false` in
    /// their usual casings). A key found nowhere yields `fallback` silently.
    pub fn bool_default(&self, key: &str, fallback: bool) -> Resolved<bool> {
        if let Some(b) = self.bools.get(key) {
            return (*b, None);
        }
        if let Some(i) = self.ints.get(key) {
            return match i {
                0 => (false, None),
                1 => (true, None),
                other => (fallback, Some(invalid_bool(key, &other.to_string()))),
            };
        }
        if let Some(raw) = self.strings.get(key) {
            let text = match envref::dereference(raw) {
                Ok(text) => text,
                Err(e) => return (fallback, Some(e)),
            };
            return match parse_bool(&text) {
                Some(b) => (b, None),
                None => (fallback, Some(invalid_bool(key, &text))),
            };
        }
        (fallback, None)
    }

    /// Resolve an integer for `key`, clamped into `bounds`.
    ///
    /// Integers are clamped directly. Strings are dereferenced and parsed
    /// first; a failure at either step returns `bounds.default`.
    pub fn int_default(&self, key: &str, bounds: BoundedInt) -> Resolved<i64> {
        if let Some(i) = self.ints.get(key) {
            return (bounds.clamp(*i), None);
        }
        if let Some(raw) = self.strings.get(key) {
            let text = match envref::dereference(raw) {
                Ok(text) => text,
                Err(e) => return (bounds.default, Some(e)),
            };
            return match text.parse::<i64>() {
                Ok(i) => (bounds.clamp(i), None),
                Err(source) => (
                    bounds.default,
                    Some(FlagfigError::InvalidInt {
                        key: key.to_string(),
                        value: text,
                        source,
                    }),
                ),
            };
        }
        (bounds.default, None)
    }

    /// Resolve a string for `key`.
    ///
    /// `fallback` is dereferenced on every call, so a fallback naming an
    /// undefined variable is reported even when `key` is absent.
    pub fn string_default(&self, key: &str, fallback: &str) -> Resolved<String> {
        let fallback = match envref::dereference(fallback) {
            Ok(text) => text,
            Err(e) => return (fallback.to_string(), Some(e)),
        };
        match self.strings.get(key) {
            Some(raw) => match envref::dereference(raw) {
                Ok(text) => (text, None),
                Err(e) => (fallback, Some(e)),
            },
            None => (fallback, None),
        }
    }

    /// The nested tree under `key`, or an empty tree when there is none.
    pub fn sub_configuration(&self, key: &str) -> ConfigTree {
        self.trees.get(key).cloned().unwrap_or_default()
    }

    /// Convert back into a TOML table. Coerced values come back as strings.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for (k, v) in &self.bools {
            table.insert(k.clone(), Value::Boolean(*v));
        }
        for (k, v) in &self.ints {
            table.insert(k.clone(), Value::Integer(*v));
        }
        for (k, v) in &self.strings {
            table.insert(k.clone(), Value::String(v.clone()));
        }
        for (k, v) in &self.trees {
            table.insert(k.clone(), Value::Table(v.to_table()));
        }
        table
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::Float(f) => f.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        other => other.to_string(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn invalid_bool(key: &str, value: &str) -> FlagfigError {
    FlagfigError::InvalidBool {
        key: key.to_string(),
        value: value.to_string(),
    }
}
