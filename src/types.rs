//! Where config files are looked for, and how several are combined.
//!
//! Lookup has two axes:
//!
//! - **Discovery**: a list of [`SearchPath`]s in priority-ascending order
//!   (last entry wins).
//! - **Resolution**: a [`SearchMode`] deciding whether every file found is
//!   merged or only the highest-priority one is used.

use std::path::PathBuf;

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit absolute path.
    Path(PathBuf),
    /// Every directory from the working directory up to `Boundary`,
    /// shallowest first.
    Ancestors(Boundary),
}

/// Where an [`Ancestors`](SearchPath::Ancestors) walk stops.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Walk to the filesystem root.
    Root,
    /// Stop at the first directory containing this entry, e.g. `.git`.
    Marker(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Deep-merge every file found; later files override earlier ones.
    #[default]
    Merge,
    /// Use only the highest-priority file found.
    FirstMatch,
}
