//! The seams between flagfig and whatever parses the command line.
//!
//! [`FlagRegistry`] receives flags with their resolved defaults before
//! parsing; [`ParsedFlags`] answers questions about the parse afterwards. The
//! `clap` feature implements both for clap's `Command` and `ArgMatches`; any
//! other parser can be plugged in by implementing them.

use crate::error::LookupError;

/// Accepts flag registrations, one method per primitive kind.
pub trait FlagRegistry {
    fn register_bool(&mut self, name: &str, short: Option<char>, default: bool, usage: &str);
    fn register_int(&mut self, name: &str, short: Option<char>, default: i64, usage: &str);
    fn register_string(&mut self, name: &str, short: Option<char>, default: &str, usage: &str);
}

/// Read access to parsed flag values.
///
/// The getters say why a value is unavailable; the reader attaches the flag
/// name.
pub trait ParsedFlags {
    /// Whether the flag was given on the command line, as opposed to
    /// holding its registered default.
    fn changed(&self, name: &str) -> bool;
    fn get_bool(&self, name: &str) -> Result<bool, LookupError>;
    fn get_int(&self, name: &str) -> Result<i64, LookupError>;
    fn get_string(&self, name: &str) -> Result<String, LookupError>;
}
