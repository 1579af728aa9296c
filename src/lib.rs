//! Config-file-backed flag defaults for Rust CLI apps.
//!
//! Flagfig lets a config file change what a command-line flag defaults to,
//! while the flag itself keeps the final word. Declare your flags, load a
//! TOML file, and bind:
//!
//! ```ignore
//! let flags = FlagSet::new("serve")
//!     .flag(FlagDeclaration::int("port", BoundedInt::new(1, 8080, 65535), "Port"))
//!     .flag(FlagDeclaration::string("root", "$HOME/www", "Document root"));
//!
//! let config = ConfigLoader::new().app_name("myapp").load()?;
//!
//! let mut cmd = clap::Command::new("serve");
//! FlagDefaultBinder::new(&config, &mut LogSink).bind(&flags, &mut cmd);
//! let matches = cmd.get_matches();
//!
//! let (values, errors) = read_flags(&flags, &matches, &mut LogSink);
//! let port = values.get_int("port")?;
//! ```
//!
//! With `myapp.toml` containing
//!
//! ```toml
//! [serve]
//! port = 3000
//! ```
//!
//! `--help` shows 3000 as the default, `myapp serve` listens on 3000 and
//! `myapp serve --port 9000` listens on 9000.
//!
//! # Precedence
//!
//! ```text
//! Declared default      FlagDeclaration::int("port", BoundedInt::new(1, 8080, 65535), ..)
//!        ↑ overridden by
//! Config file           [serve] port = 3000
//!        ↑ overridden by
//! Command line          --port 9000
//! ```
//!
//! A flag set named `serve` reads only the `[serve]` table. Keys outside it,
//! and keys with no matching declaration, are ignored.
//!
//! # Value rules
//!
//! - **Booleans** accept TOML booleans, the integers `0` and `1`, and the
//!   strings `t`, `T`, `true`, `TRUE`, `True` and their `false` forms.
//! - **Integers** accept TOML integers and decimal strings, and are clamped
//!   into the declaration's [`BoundedInt`] range.
//! - **Strings** have `$VAR` and `%VAR%` references replaced with environment
//!   values (see [`envref`]). A reference to an undefined variable fails the
//!   whole string.
//! - Floats, datetimes and arrays in the file are kept as text, with a
//!   warning.
//!
//! A value that cannot be used does not abort binding: that one flag is
//! reported and left unregistered, and every other flag proceeds.
//!
//! # Diagnostics
//!
//! Nothing in the resolution path logs. Problems are collected as
//! [`Diagnostic`] records and handed to a [`DiagnosticSink`]. [`LogSink`]
//! prints them to stderr and emits `tracing` events (see
//! [`logging::init_logging`]); a `Vec<Diagnostic>` keeps them for
//! inspection.
//!
//! # File discovery
//!
//! [`ConfigLoader`] looks for `{app_name}.toml` along a list of
//! [`SearchPath`]s in **priority-ascending** order. Under
//! [`SearchMode::Merge`] (default) every file found is deep-merged, later
//! files winning; under [`SearchMode::FirstMatch`] only the highest-priority
//! file is used. Missing files are skipped.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` Cargo feature, on by default)
//! implements [`FlagRegistry`] for `clap::Command` and [`ParsedFlags`] for
//! `clap::ArgMatches`. Any other parser can be used by implementing the two
//! traits:
//!
//! ```toml
//! flagfig = { version = "...", default-features = false }
//! ```
//!
//! # Generated defaults
//!
//! The binder records every effective default in a [`DefaultsBuilder`],
//! which renders a commented TOML file with each flag's usage text above it.

pub mod binder;
pub mod bounds;
pub mod consumer;
pub mod defaults;
pub mod diagnostics;
pub mod envref;
pub mod error;
pub mod file;
pub mod flags;
pub mod loader;
pub mod logging;
pub mod reader;
pub mod tree;
pub mod types;

#[cfg(feature = "clap")]
mod cli;

#[cfg(test)]
mod fixtures;

pub use binder::{FlagDefaultBinder, resolve_default};
pub use bounds::BoundedInt;
pub use consumer::{FlagRegistry, ParsedFlags};
pub use defaults::DefaultsBuilder;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, Severity};
pub use error::{FlagfigError, LookupError};
pub use flags::{FlagDeclaration, FlagDefault, FlagKind, FlagSet, FlagValue};
pub use loader::ConfigLoader;
pub use reader::{FlagValues, ResolvedFlagValue, read_flags, read_selected};
pub use tree::{ConfigTree, Resolved};
pub use types::{Boundary, SearchMode, SearchPath};
