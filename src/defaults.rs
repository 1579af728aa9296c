//! Accumulates the effective flag defaults as they are resolved.
//!
//! The binder records every default it registers, keyed by flag-set name.
//! The result can be rendered as a commented TOML document (each flag's
//! usage text becomes the comment above it) and written out as a starting
//! config file, or fed back in as a table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use toml_edit::{DocumentMut, Item};

use crate::error::FlagfigError;
use crate::flags::FlagValue;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    value: FlagValue,
    usage: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultsBuilder {
    sets: BTreeMap<String, BTreeMap<String, Entry>>,
}

impl DefaultsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the default of `flag` in `set`. Recording the same flag twice
    /// keeps the latest value.
    pub fn record(&mut self, set: &str, flag: &str, value: FlagValue, usage: &str) {
        self.sets.entry(set.to_string()).or_default().insert(
            flag.to_string(),
            Entry {
                value,
                usage: usage.to_string(),
            },
        );
    }

    pub fn get(&self, set: &str, flag: &str) -> Option<&FlagValue> {
        self.sets.get(set)?.get(flag).map(|e| &e.value)
    }

    /// Names of the flag sets recorded so far, sorted.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The recorded defaults as a TOML table, one sub-table per flag set.
    /// Flags of an unnamed set land at the top level.
    pub fn to_table(&self) -> Table {
        let mut root = Table::new();
        for (set, entries) in &self.sets {
            let mut table = Table::new();
            for (flag, entry) in entries {
                table.insert(flag.clone(), to_toml(&entry.value));
            }
            if set.is_empty() {
                root.extend(table);
            } else {
                root.insert(set.clone(), Value::Table(table));
            }
        }
        root
    }

    /// Render the recorded defaults as a commented TOML document.
    pub fn render(&self) -> String {
        let mut doc = DocumentMut::new();
        for (set, entries) in &self.sets {
            let table = if set.is_empty() {
                doc.as_table_mut()
            } else {
                let item = doc
                    .entry(set)
                    .or_insert(Item::Table(toml_edit::Table::new()));
                match item.as_table_mut() {
                    Some(table) => table,
                    None => continue,
                }
            };
            for (flag, entry) in entries {
                table.insert(flag, toml_edit::value(to_edit(&entry.value)));
                if !entry.usage.is_empty()
                    && let Some(mut key) = table.key_mut(flag)
                {
                    key.leaf_decor_mut().set_prefix(comment(&entry.usage));
                }
            }
        }
        doc.to_string()
    }

    /// Write the rendered document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<PathBuf, FlagfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FlagfigError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, self.render()).map_err(|e| FlagfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(path.to_path_buf())
    }
}

fn comment(usage: &str) -> String {
    usage.lines().map(|line| format!("# {line}\n")).collect()
}

fn to_toml(value: &FlagValue) -> Value {
    match value {
        FlagValue::Bool(b) => Value::Boolean(*b),
        FlagValue::Int(i) => Value::Integer(*i),
        FlagValue::String(s) => Value::String(s.clone()),
    }
}

fn to_edit(value: &FlagValue) -> toml_edit::Value {
    match value {
        FlagValue::Bool(b) => toml_edit::Value::from(*b),
        FlagValue::Int(i) => toml_edit::Value::from(*i),
        FlagValue::String(s) => toml_edit::Value::from(s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> DefaultsBuilder {
        let mut defaults = DefaultsBuilder::new();
        defaults.record("serve", "port", FlagValue::Int(8080), "Port to listen on");
        defaults.record("serve", "debug", FlagValue::Bool(false), "Enable debug output");
        defaults.record("fetch", "url", FlagValue::String("https://x".into()), "");
        defaults
    }

    #[test]
    fn record_and_get() {
        let defaults = sample();
        assert_eq!(defaults.get("serve", "port"), Some(&FlagValue::Int(8080)));
        assert_eq!(defaults.get("serve", "nope"), None);
        assert_eq!(defaults.get("nope", "port"), None);
    }

    #[test]
    fn later_record_wins() {
        let mut defaults = DefaultsBuilder::new();
        defaults.record("s", "n", FlagValue::Int(1), "");
        defaults.record("s", "n", FlagValue::Int(2), "");
        assert_eq!(defaults.get("s", "n"), Some(&FlagValue::Int(2)));
    }

    #[test]
    fn set_names_sorted() {
        let defaults = sample();
        let names: Vec<&str> = defaults.set_names().collect();
        assert_eq!(names, vec!["fetch", "serve"]);
    }

    #[test]
    fn to_table_nests_by_set() {
        let table = sample().to_table();
        assert_eq!(table["serve"]["port"].as_integer(), Some(8080));
        assert_eq!(table["serve"]["debug"].as_bool(), Some(false));
        assert_eq!(table["fetch"]["url"].as_str(), Some("https://x"));
    }

    #[test]
    fn unnamed_set_is_top_level() {
        let mut defaults = DefaultsBuilder::new();
        defaults.record("", "verbose", FlagValue::Bool(true), "");
        let table = defaults.to_table();
        assert_eq!(table["verbose"].as_bool(), Some(true));
    }

    #[test]
    fn render_includes_values_and_usage_comments() {
        let out = sample().render();
        assert!(out.contains("[serve]"));
        assert!(out.contains("port = 8080"));
        assert!(out.contains("# Port to listen on"));
        assert!(out.contains("debug = false"));
        assert!(out.contains("url = \"https://x\""));
    }

    #[test]
    fn render_parses_back_to_same_table() {
        let defaults = sample();
        let parsed: Table = defaults.render().parse().unwrap();
        assert_eq!(parsed, defaults.to_table());
    }

    #[test]
    fn render_empty_is_empty() {
        assert!(DefaultsBuilder::new().render().trim().is_empty());
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("defaults.toml");
        let written = sample().write_to(&path).unwrap();
        assert_eq!(written, path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("port = 8080"));
    }
}
