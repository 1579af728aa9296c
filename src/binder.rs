//! Resolve each declared flag's effective default and register it.
//!
//! For a flag in set `serve`, the effective default is found by:
//!
//! 1. Starting from the declared default.
//! 2. Overriding it with the value under `[serve]` in the config tree, if any.
//! 3. Dereferencing `$VAR` / `%VAR%` references in string values.
//! 4. Clamping integers into the declared [`BoundedInt`](crate::BoundedInt).
//!
//! A flag whose declaration is inconsistent, or whose configured value cannot
//! be used, is reported to the diagnostic sink and left unregistered. Other
//! flags in the set are unaffected.

use crate::consumer::FlagRegistry;
use crate::defaults::DefaultsBuilder;
use crate::diagnostics::{DiagnosticSink, error_diagnostic};
use crate::error::FlagfigError;
use crate::flags::{FlagDeclaration, FlagDefault, FlagKind, FlagSet, FlagValue};
use crate::tree::ConfigTree;

pub struct FlagDefaultBinder<'a> {
    config: &'a ConfigTree,
    sink: &'a mut dyn DiagnosticSink,
    defaults: DefaultsBuilder,
}

impl<'a> FlagDefaultBinder<'a> {
    pub fn new(config: &'a ConfigTree, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            config,
            sink,
            defaults: DefaultsBuilder::new(),
        }
    }

    /// Resolve and register every flag of `set`, in flag-name order.
    ///
    /// Returns the errors that were reported; an empty vector means every
    /// flag was registered.
    pub fn bind(&mut self, set: &FlagSet, registry: &mut dyn FlagRegistry) -> Vec<FlagfigError> {
        let scoped = self.config.sub_configuration(set.name());
        let mut errors = Vec::new();

        for decl in set.iter() {
            match resolve_default(&scoped, set.name(), decl) {
                Ok(value) => {
                    let usage = annotate_usage(&decl.usage, &value);
                    register(registry, decl, &value, &usage);
                    self.defaults.record(set.name(), &decl.name, value, &decl.usage);
                }
                Err(err) => {
                    let event = if err.is_programmer_error() {
                        "flagfig.bind.declaration_invalid"
                    } else {
                        "flagfig.bind.config_invalid"
                    };
                    self.sink.emit(
                        error_diagnostic(event, &err)
                            .field("flag_set", set.name())
                            .field("flag", &decl.name),
                    );
                    errors.push(err);
                }
            }
        }

        errors
    }

    pub fn defaults(&self) -> &DefaultsBuilder {
        &self.defaults
    }

    /// Give up the binder and keep the accumulated defaults.
    pub fn into_defaults(self) -> DefaultsBuilder {
        self.defaults
    }
}

/// Compute the effective default of one declaration against its set's tree.
pub fn resolve_default(
    scoped: &ConfigTree,
    set: &str,
    decl: &FlagDeclaration,
) -> Result<FlagValue, FlagfigError> {
    let resolved = match (decl.kind, &decl.default) {
        (FlagKind::Unspecified, _) => {
            return Err(FlagfigError::UnspecifiedKind {
                flag: decl.name.clone(),
            });
        }
        (FlagKind::Bool, FlagDefault::Bool(fallback)) => {
            let (value, err) = scoped.bool_default(&decl.name, *fallback);
            (FlagValue::Bool(value), err)
        }
        (FlagKind::Int, FlagDefault::Int(bounds)) => {
            let (value, err) = scoped.int_default(&decl.name, *bounds);
            (FlagValue::Int(value), err)
        }
        (FlagKind::String, FlagDefault::String(fallback)) => {
            let (value, err) = scoped.string_default(&decl.name, fallback);
            (FlagValue::String(value), err)
        }
        (expected, default) => {
            return Err(FlagfigError::DefaultTypeMismatch {
                flag: decl.name.clone(),
                expected,
                actual: default.kind(),
            });
        }
    };

    match resolved {
        (value, None) => Ok(value),
        (_, Some(err)) => Err(FlagfigError::invalid_config(set, err)),
    }
}

/// Zero-valued defaults are not shown by most help renderers, so mention
/// them explicitly.
fn annotate_usage(usage: &str, value: &FlagValue) -> String {
    match value {
        FlagValue::Bool(false) => format!("{usage} (default false)"),
        FlagValue::Int(0) => format!("{usage} (default 0)"),
        FlagValue::String(s) if s.is_empty() => format!("{usage} (default \"\")"),
        _ => usage.to_string(),
    }
}

fn register(
    registry: &mut dyn FlagRegistry,
    decl: &FlagDeclaration,
    value: &FlagValue,
    usage: &str,
) {
    match value {
        FlagValue::Bool(b) => registry.register_bool(&decl.name, decl.short, *b, usage),
        FlagValue::Int(i) => registry.register_int(&decl.name, decl.short, *i, usage),
        FlagValue::String(s) => registry.register_string(&decl.name, decl.short, s, usage),
    }
}
