//! Environment-variable dereferencing for configuration strings.
//!
//! Two reference forms are recognised in the same string:
//!
//! | Form | Example | Terminator |
//! |------|---------|------------|
//! | POSIX | `$HOME`, `$XDG_CONFIG_HOME` | greedy run of `[A-Za-z0-9_]` |
//! | Windows | `%APPDATA%` | closing `%` |
//!
//! POSIX references have no terminator, so `$VAR` is a textual prefix of
//! `$VAR_EXTRA`. [`references`] lists them longest name first, and
//! substitution matches each reference greedily, so `$VAR_EXTRA` is never
//! read as `$VAR` followed by `_EXTRA`.
//!
//! Substitution is a single scan over the input. Values are inserted
//! verbatim: a value that itself contains `$NAME` or `%NAME%` is not
//! expanded again.
//!
//! Dereferencing is all-or-nothing. If any referenced variable is undefined
//! the whole call fails with [`FlagfigError::MissingEnvVars`] listing every
//! missing name, sorted and deduplicated.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::FlagfigError;

static POSIX_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid POSIX reference pattern")
});

static WINDOWS_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").expect("valid Windows reference pattern")
});

static ANY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*|%[A-Za-z_][A-Za-z0-9_]*%")
        .expect("valid reference pattern")
});

/// A single reference found in a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EnvReference {
    /// The literal text to replace, e.g. `$HOME` or `%APPDATA%`.
    pub token: String,
    /// The bare variable name, e.g. `HOME`.
    pub name: String,
}

/// Collect the distinct references in `input`, in substitution order:
/// POSIX references longest-first, then Windows references alphabetically.
pub fn references(input: &str) -> Vec<EnvReference> {
    let mut posix: Vec<EnvReference> = distinct(&POSIX_REF, input).into_iter().collect();
    // Longest name first; ties broken by name so the order is stable.
    posix.sort_by(|a, b| b.name.len().cmp(&a.name.len()).then_with(|| a.name.cmp(&b.name)));

    let windows = distinct(&WINDOWS_REF, input);

    posix.into_iter().chain(windows).collect()
}

fn distinct(pattern: &Regex, input: &str) -> BTreeSet<EnvReference> {
    pattern
        .captures_iter(input)
        .map(|caps| EnvReference {
            token: caps[0].to_string(),
            name: caps[1].to_string(),
        })
        .collect()
}

/// Dereference `input` against the process environment.
pub fn dereference(input: &str) -> Result<String, FlagfigError> {
    dereference_with(input, |name| std::env::var(name).ok())
}

/// Dereference `input` using `lookup` to resolve variable names.
///
/// Takes a closure so tests can supply synthetic environments instead of
/// mutating the process environment.
pub fn dereference_with<F>(input: &str, lookup: F) -> Result<String, FlagfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values: HashMap<String, String> = HashMap::new();
    let mut missing = BTreeSet::new();

    for reference in references(input) {
        match lookup(&reference.name) {
            Some(value) => {
                values.insert(reference.token, value);
            }
            None => {
                missing.insert(reference.name);
            }
        }
    }

    if !missing.is_empty() {
        return Err(FlagfigError::MissingEnvVars {
            names: missing.into_iter().collect(),
        });
    }

    let output = ANY_REF.replace_all(input, |caps: &Captures| {
        values
            .get(&caps[0])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(output.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn missing_names(result: Result<String, FlagfigError>) -> Vec<String> {
        match result {
            Err(FlagfigError::MissingEnvVars { names }) => names,
            other => panic!("Expected MissingEnvVars, got: {other:?}"),
        }
    }

    #[test]
    fn no_references_is_identity() {
        for input in ["", "plain text", "100%", "cost: $5", "50% off 20%"] {
            assert_eq!(dereference_with(input, env(&[])).unwrap(), input);
        }
    }

    #[test]
    fn posix_reference_substituted() {
        let out = dereference_with("hello $USER_NAME!", env(&[("USER_NAME", "ada")])).unwrap();
        assert_eq!(out, "hello ada!");
    }

    #[test]
    fn windows_reference_substituted() {
        let out =
            dereference_with(r"%APPDATA%\tool", env(&[("APPDATA", r"C:\Users\ada")])).unwrap();
        assert_eq!(out, r"C:\Users\ada\tool");
    }

    #[test]
    fn both_styles_in_one_string() {
        let out = dereference_with(
            "$HOME and %TEMP%",
            env(&[("HOME", "/home/ada"), ("TEMP", "/tmp")]),
        )
        .unwrap();
        assert_eq!(out, "/home/ada and /tmp");
    }

    #[test]
    fn every_occurrence_replaced() {
        let out = dereference_with("$A-$A-%A%", env(&[("A", "x")])).unwrap();
        assert_eq!(out, "x-x-x");
    }

    #[test]
    fn prefix_names_do_not_corrupt_longer_names() {
        let lookup = env(&[("VAR", "a"), ("VAR_EXTRA", "b")]);
        assert_eq!(dereference_with("$VAR $VAR_EXTRA", &lookup).unwrap(), "a b");
        assert_eq!(dereference_with("$VAR_EXTRA $VAR", &lookup).unwrap(), "b a");
    }

    #[test]
    fn no_reference_syntax_remains_after_success() {
        let out = dereference_with(
            "$ONE/%TWO%/$THREE_3",
            env(&[("ONE", "1"), ("TWO", "2"), ("THREE_3", "3")]),
        )
        .unwrap();
        assert_eq!(out, "1/2/3");
        assert!(references(&out).is_empty());
    }

    #[test]
    fn values_are_not_expanded_again() {
        let lookup = env(&[("LONG", "$A"), ("A", "x"), ("WIN", "%A%")]);
        assert_eq!(dereference_with("$LONG $A", &lookup).unwrap(), "$A x");
        assert_eq!(dereference_with("%WIN%/$A", &lookup).unwrap(), "%A%/x");
    }

    #[test]
    fn missing_names_sorted_and_deduplicated() {
        let result = dereference_with("$ZED %ALPHA% $ZED $MID %ZED%", env(&[]));
        assert_eq!(missing_names(result), vec!["ALPHA", "MID", "ZED"]);
    }

    #[test]
    fn partial_definition_still_fails() {
        let result = dereference_with("$KNOWN and $UNKNOWN", env(&[("KNOWN", "k")]));
        assert_eq!(missing_names(result), vec!["UNKNOWN"]);
    }

    #[test]
    fn empty_value_is_defined() {
        let out = dereference_with("[$EMPTY]", env(&[("EMPTY", "")])).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn identifier_cannot_start_with_digit() {
        assert_eq!(dereference_with("$1 and %2X%", env(&[])).unwrap(), "$1 and %2X%");
    }

    #[test]
    fn references_are_ordered_longest_first() {
        let refs = references("$A $ABC $AB %Z% %B%");
        let tokens: Vec<&str> = refs.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["$ABC", "$AB", "$A", "%B%", "%Z%"]);
    }

    #[test]
    fn process_environment_lookup() {
        // PATH is set in any environment the test suite runs in.
        let expected = std::env::var("PATH").unwrap();
        assert_eq!(dereference("$PATH").unwrap(), expected);
    }
}
