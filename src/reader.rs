//! Read back typed flag values, and whether the user set them, after the
//! command line has been parsed.
//!
//! Reading never stops at the first problem. Every flag that can be read ends
//! up in [`FlagValues`]; every flag that cannot contributes one error to the
//! returned list, which is also reported to the diagnostic sink. An empty
//! error list is the success signal.

use std::collections::BTreeMap;

use crate::consumer::ParsedFlags;
use crate::diagnostics::{DiagnosticSink, report_errors};
use crate::error::{FlagfigError, LookupError};
use crate::flags::{FlagDeclaration, FlagKind, FlagSet, FlagValue};

const READ_FAILED: &str = "flagfig.read.flag_failed";

/// A flag's final value and its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFlagValue {
    pub value: FlagValue,
    /// True only when the flag was given on the command line.
    pub user_set: bool,
}

/// Resolved values keyed by flag name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagValues {
    values: BTreeMap<String, ResolvedFlagValue>,
}

impl FlagValues {
    pub fn insert(&mut self, name: &str, value: FlagValue, user_set: bool) {
        self.values
            .insert(name.to_string(), ResolvedFlagValue { value, user_set });
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedFlagValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedFlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn lookup(&self, name: &str) -> Result<&ResolvedFlagValue, FlagfigError> {
        if self.values.is_empty() {
            return Err(FlagfigError::NoResults);
        }
        self.values
            .get(name)
            .ok_or_else(|| FlagfigError::FlagNotDeclared {
                flag: name.to_string(),
            })
    }

    /// Whether `name` was given on the command line.
    pub fn user_set(&self, name: &str) -> Result<bool, FlagfigError> {
        self.lookup(name).map(|r| r.user_set)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, FlagfigError> {
        match &self.lookup(name)?.value {
            FlagValue::Bool(b) => Ok(*b),
            other => Err(mismatch(name, FlagKind::Bool, other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, FlagfigError> {
        match &self.lookup(name)?.value {
            FlagValue::Int(i) => Ok(*i),
            other => Err(mismatch(name, FlagKind::Int, other)),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<String, FlagfigError> {
        match &self.lookup(name)?.value {
            FlagValue::String(s) => Ok(s.clone()),
            other => Err(mismatch(name, FlagKind::String, other)),
        }
    }
}

fn mismatch(name: &str, expected: FlagKind, actual: &FlagValue) -> FlagfigError {
    FlagfigError::FlagTypeMismatch {
        flag: name.to_string(),
        expected,
        actual: actual.kind(),
        value: actual.to_string(),
    }
}

/// Read every flag declared in `set`, in flag-name order.
pub fn read_flags(
    set: &FlagSet,
    parsed: &dyn ParsedFlags,
    sink: &mut dyn DiagnosticSink,
) -> (FlagValues, Vec<FlagfigError>) {
    let names: Vec<&str> = set.iter().map(|d| d.name.as_str()).collect();
    read_selected(set, &names, parsed, sink)
}

/// Read the named flags of `set`, in sorted-name order. Names with no
/// declaration in `set` produce a [`FlagfigError::FlagNotDeclared`].
pub fn read_selected(
    set: &FlagSet,
    names: &[&str],
    parsed: &dyn ParsedFlags,
    sink: &mut dyn DiagnosticSink,
) -> (FlagValues, Vec<FlagfigError>) {
    let mut sorted = names.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut values = FlagValues::default();
    let mut errors = Vec::new();

    for name in sorted {
        let result = match set.get(name) {
            Some(decl) => read_one(decl, parsed),
            None => Err(FlagfigError::FlagNotDeclared {
                flag: name.to_string(),
            }),
        };
        match result {
            Ok(value) => values.insert(name, value, parsed.changed(name)),
            Err(err) => errors.push(err),
        }
    }

    report_errors(sink, READ_FAILED, &errors);
    (values, errors)
}

fn read_one(decl: &FlagDeclaration, parsed: &dyn ParsedFlags) -> Result<FlagValue, FlagfigError> {
    let name = decl.name.as_str();
    let lookup = |source: LookupError| FlagfigError::FlagLookup {
        flag: name.to_string(),
        source,
    };
    match decl.kind {
        FlagKind::Bool => parsed.get_bool(name).map(FlagValue::Bool).map_err(lookup),
        FlagKind::Int => parsed.get_int(name).map(FlagValue::Int).map_err(lookup),
        FlagKind::String => parsed.get_string(name).map(FlagValue::String).map_err(lookup),
        FlagKind::Unspecified => Err(FlagfigError::UnspecifiedKind {
            flag: name.to_string(),
        }),
    }
}
