//! Flag declarations and the named sets that group them.

use std::collections::BTreeMap;
use std::fmt;

use crate::bounds::BoundedInt;

/// The primitive type a flag carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// No kind was declared. Binding or reading such a flag is always an error.
    #[default]
    Unspecified,
    Bool,
    Int,
    String,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlagKind::Unspecified => "unspecified",
            FlagKind::Bool => "bool",
            FlagKind::Int => "int",
            FlagKind::String => "string",
        };
        f.write_str(name)
    }
}

/// The programmer-declared default of a flag.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagDefault {
    Bool(bool),
    Int(BoundedInt),
    String(String),
}

impl FlagDefault {
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagDefault::Bool(_) => FlagKind::Bool,
            FlagDefault::Int(_) => FlagKind::Int,
            FlagDefault::String(_) => FlagKind::String,
        }
    }
}

/// A flag's final value, as resolved or parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::String(_) => FlagKind::String,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::String(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlagDeclaration {
    pub name: String,
    pub short: Option<char>,
    pub usage: String,
    pub kind: FlagKind,
    pub default: FlagDefault,
}

impl FlagDeclaration {
    /// Declare a flag with an explicit kind. Nothing checks that `kind`
    /// agrees with `default` here; the binder reports a mismatch.
    pub fn new(name: &str, kind: FlagKind, default: FlagDefault, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            usage: usage.to_string(),
            kind,
            default,
        }
    }

    pub fn bool(name: &str, default: bool, usage: &str) -> Self {
        Self::new(name, FlagKind::Bool, FlagDefault::Bool(default), usage)
    }

    pub fn int(name: &str, bounds: BoundedInt, usage: &str) -> Self {
        Self::new(name, FlagKind::Int, FlagDefault::Int(bounds), usage)
    }

    pub fn string(name: &str, default: &str, usage: &str) -> Self {
        Self::new(
            name,
            FlagKind::String,
            FlagDefault::String(default.to_string()),
            usage,
        )
    }

    /// Add a single-character abbreviation (`-v` for `--verbose`).
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

/// A named group of flag declarations.
///
/// The name selects the configuration sub-tree the flags read their
/// defaults from, so a set named `serve` is fed by the `[serve]` table.
/// Declarations are kept sorted by flag name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, FlagDeclaration>,
}

impl FlagSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: BTreeMap::new(),
        }
    }

    /// Add a declaration. A later declaration with the same name replaces
    /// the earlier one.
    pub fn flag(mut self, declaration: FlagDeclaration) -> Self {
        self.insert(declaration);
        self
    }

    pub fn insert(&mut self, declaration: FlagDeclaration) {
        self.flags.insert(declaration.name.clone(), declaration);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&FlagDeclaration> {
        self.flags.get(name)
    }

    /// Declarations in flag-name order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagDeclaration> {
        self.flags.values()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
