//! Clap adapter for flagfig.
//!
//! This module is the **optional integration layer** between flagfig's
//! parser-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`FlagRegistry`] is implemented for [`clap::Command`], so the binder can
//! add one `--flag` argument per declaration with its resolved default.
//! [`ParsedFlags`] is implemented for [`clap::ArgMatches`], so the reader can
//! pull typed values back out and tell user-supplied values from defaults.
//!
//! ```ignore
//! let mut cmd = clap::Command::new("serve");
//! let errors = FlagDefaultBinder::new(&config, &mut LogSink).bind(&flags, &mut cmd);
//! let matches = cmd.get_matches();
//! let (values, errors) = read_flags(&flags, &matches, &mut LogSink);
//! ```
//!
//! Boolean flags accept a bare `--verbose` as `true` and an explicit
//! `--verbose=false` to turn a config-supplied `true` back off.

use clap::builder::BoolishValueParser;
use clap::parser::{MatchesError, ValueSource};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::consumer::{FlagRegistry, ParsedFlags};
use crate::error::LookupError;
use crate::flags::FlagKind;

fn flag_arg(name: &str, short: Option<char>, usage: &str) -> Arg {
    let arg = Arg::new(name.to_string())
        .long(name.to_string())
        .help(usage.to_string())
        .action(ArgAction::Set);
    match short {
        Some(c) => arg.short(c),
        None => arg,
    }
}

impl FlagRegistry for Command {
    fn register_bool(&mut self, name: &str, short: Option<char>, default: bool, usage: &str) {
        let arg = flag_arg(name, short, usage)
            .value_parser(BoolishValueParser::new())
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value(if default { "true" } else { "false" });
        *self = std::mem::take(self).arg(arg);
    }

    fn register_int(&mut self, name: &str, short: Option<char>, default: i64, usage: &str) {
        let arg = flag_arg(name, short, usage)
            .value_parser(clap::value_parser!(i64))
            .allow_negative_numbers(true)
            .default_value(default.to_string());
        *self = std::mem::take(self).arg(arg);
    }

    fn register_string(&mut self, name: &str, short: Option<char>, default: &str, usage: &str) {
        let arg = flag_arg(name, short, usage)
            .value_parser(clap::value_parser!(String))
            .default_value(default.to_string());
        *self = std::mem::take(self).arg(arg);
    }
}

fn get_one<T>(matches: &ArgMatches, name: &str, expected: FlagKind) -> Result<T, LookupError>
where
    T: Clone + Send + Sync + 'static,
{
    match matches.try_get_one::<T>(name) {
        Ok(Some(value)) => Ok(value.clone()),
        Ok(None) => Err(LookupError::NoValue),
        Err(MatchesError::UnknownArgument { .. }) => Err(LookupError::NotRegistered),
        Err(MatchesError::Downcast { .. }) => Err(LookupError::WrongKind { expected }),
        Err(e) => Err(LookupError::Parser(e.to_string())),
    }
}

impl ParsedFlags for ArgMatches {
    fn changed(&self, name: &str) -> bool {
        // `value_source` asserts the id exists in debug builds.
        matches!(self.try_contains_id(name), Ok(true))
            && self.value_source(name) == Some(ValueSource::CommandLine)
    }

    fn get_bool(&self, name: &str) -> Result<bool, LookupError> {
        get_one(self, name, FlagKind::Bool)
    }

    fn get_int(&self, name: &str) -> Result<i64, LookupError> {
        get_one(self, name, FlagKind::Int)
    }

    fn get_string(&self, name: &str) -> Result<String, LookupError> {
        get_one(self, name, FlagKind::String)
    }
}
