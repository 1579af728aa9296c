//! Locate, decode and merge config files into a [`ConfigTree`].

use std::path::PathBuf;

use toml::{Table, Value};
use tracing::debug;

use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::FlagfigError;
use crate::file::{self, ConfigFile};
use crate::tree::ConfigTree;
use crate::types::{SearchMode, SearchPath};

/// Builder for finding and loading configuration files.
///
/// ```ignore
/// let config = ConfigLoader::new()
///     .app_name("myapp")
///     .add_search_path(SearchPath::Ancestors(Boundary::Marker(".git")))
///     .load()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    search_mode: SearchMode,
    start_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name. This derives the defaults:
    /// - `file_name` → `"{app_name}.toml"`
    /// - `search_paths` → `[SearchPath::Platform]`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.toml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    /// If no paths have been set yet, starts from the default `[Platform]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    /// Set the search mode (default: [`SearchMode::Merge`]).
    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Directory that [`SearchPath::Ancestors`] walks up from (default: the
    /// working directory).
    pub fn start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    fn effective_app_name(&self) -> Result<&str, FlagfigError> {
        self.app_name
            .as_deref()
            .ok_or(FlagfigError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, FlagfigError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.toml"))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(|| vec![SearchPath::Platform])
    }

    /// The config files found, in priority-ascending order.
    pub fn files(&self) -> Result<Vec<ConfigFile>, FlagfigError> {
        let app_name = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        let dirs = file::expand_search_paths(
            &self.effective_search_paths(),
            app_name,
            self.start_dir.as_deref(),
        );
        let files = file::load_config_files(&dirs, &file_name, self.search_mode)?;
        for f in &files {
            debug!(event = "flagfig.load.file_found", path = %f.path.display());
        }
        Ok(files)
    }

    /// Every file found, deep-merged into one table.
    pub fn load_table(&self) -> Result<Table, FlagfigError> {
        let merged = self
            .files()?
            .into_iter()
            .fold(Table::new(), |acc, f| merge_tables(acc, f.table));
        Ok(merged)
    }

    /// Load into a [`ConfigTree`], reporting coerced values through [`LogSink`].
    pub fn load(&self) -> Result<ConfigTree, FlagfigError> {
        self.load_with_sink(&mut LogSink)
    }

    pub fn load_with_sink(&self, sink: &mut dyn DiagnosticSink) -> Result<ConfigTree, FlagfigError> {
        let table = self.load_table()?;
        Ok(ConfigTree::with_sink(&table, sink))
    }
}

/// Deep-merge `overlay` on top of `base`. Tables present on both sides are
/// merged recursively; otherwise the overlay value wins.
pub fn merge_tables(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Table(lower)), Value::Table(upper)) => {
                Value::Table(merge_tables(lower, upper))
            }
            (_, value) => value,
        };
        base.insert(key, merged);
    }
    base
}
