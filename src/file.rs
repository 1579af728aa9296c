//! Config file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one or more directories:
//!
//! - `Platform`, `Home`, `Cwd`, `Path` resolve to a single directory.
//! - `Ancestors(boundary)` expands inline into every directory from the
//!   starting directory up toward the root, **shallowest first**, so the
//!   directory closest to the start has the highest priority.
//!
//! Each directory is then checked for `{dir}/{file_name}`. Under
//! [`SearchMode::Merge`] every file found is returned in priority order;
//! under [`SearchMode::FirstMatch`] only the highest-priority one is. Missing
//! files are skipped. Other I/O errors and TOML syntax errors come back with
//! the offending path.

use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::FlagfigError;
use crate::types::{Boundary, SearchMode, SearchPath};

/// A decoded config file and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub table: Table,
}

/// Resolve a single-directory [`SearchPath`].
///
/// Returns `None` when the directory cannot be determined (no home
/// directory) and for [`SearchPath::Ancestors`], which names many
/// directories.
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
        SearchPath::Ancestors(_) => None,
    }
}

/// Walk from `start` toward the root and return the visited directories,
/// shallowest first.
///
/// With [`Boundary::Marker`] the walk stops (inclusive) at the first
/// directory containing the marker, or reaches the root if none does.
pub fn expand_ancestors(start: &Path, boundary: &Boundary) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if let Boundary::Marker(name) = boundary
            && dir.join(name).exists()
        {
            break;
        }
    }
    dirs.reverse();
    dirs
}

/// Expand `search_paths` into a flat, priority-ascending directory list.
///
/// `Ancestors` entries walk up from `start`, or from the working directory
/// when `start` is `None`. Entries that cannot be resolved are dropped.
pub fn expand_search_paths(
    search_paths: &[SearchPath],
    app_name: &str,
    start: Option<&Path>,
) -> Vec<PathBuf> {
    let cwd = match start {
        Some(dir) => Some(dir.to_path_buf()),
        None => std::env::current_dir().ok(),
    };
    let mut dirs = Vec::new();
    for sp in search_paths {
        match sp {
            SearchPath::Ancestors(boundary) => {
                if let Some(cwd) = &cwd {
                    dirs.extend(expand_ancestors(cwd, boundary));
                }
            }
            other => dirs.extend(resolve_search_path(other, app_name)),
        }
    }
    dirs
}

/// Read and decode `{dir}/{file_name}` for each directory, honouring `mode`.
pub fn load_config_files(
    dirs: &[PathBuf],
    file_name: &str,
    mode: SearchMode,
) -> Result<Vec<ConfigFile>, FlagfigError> {
    let candidates = dirs.iter().map(|dir| dir.join(file_name));
    match mode {
        SearchMode::Merge => {
            let mut files = Vec::new();
            for path in candidates {
                files.extend(read_optional(&path)?);
            }
            Ok(files)
        }
        SearchMode::FirstMatch => {
            for path in candidates.rev() {
                if let Some(file) = read_optional(&path)? {
                    return Ok(vec![file]);
                }
            }
            Ok(Vec::new())
        }
    }
}

/// `Ok(None)` when the file does not exist.
fn read_optional(path: &Path) -> Result<Option<ConfigFile>, FlagfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(FlagfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let table = content
        .parse::<Table>()
        .map_err(|e| FlagfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(Some(ConfigFile {
        path: path.to_path_buf(),
        table,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, content: &str) {
        fs::write(dir.join("app.toml"), content).unwrap();
    }

    #[test]
    fn explicit_path_resolves_to_itself() {
        let p = PathBuf::from("/srv/app");
        assert_eq!(resolve_search_path(&SearchPath::Path(p.clone()), "x"), Some(p));
    }

    #[test]
    fn ancestors_do_not_resolve_to_one_dir() {
        assert_eq!(
            resolve_search_path(&SearchPath::Ancestors(Boundary::Root), "x"),
            None
        );
    }

    #[test]
    fn merge_returns_all_found_in_order() {
        let low = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        write(low.path(), "[serve]\nhost = \"low\"\n");
        write(high.path(), "[serve]\nport = 1\n");

        let dirs = vec![
            low.path().to_path_buf(),
            empty.path().to_path_buf(),
            high.path().to_path_buf(),
        ];
        let files = load_config_files(&dirs, "app.toml", SearchMode::Merge).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, low.path().join("app.toml"));
        assert_eq!(files[1].table["serve"]["port"].as_integer(), Some(1));
    }

    #[test]
    fn first_match_prefers_highest_priority() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        write(low.path(), "name = \"low\"\n");
        write(high.path(), "name = \"high\"\n");

        let dirs = vec![low.path().to_path_buf(), high.path().to_path_buf()];
        let files = load_config_files(&dirs, "app.toml", SearchMode::FirstMatch).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].table["name"].as_str(), Some("high"));
    }

    #[test]
    fn first_match_falls_back() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        write(low.path(), "name = \"low\"\n");

        let dirs = vec![low.path().to_path_buf(), high.path().to_path_buf()];
        let files = load_config_files(&dirs, "app.toml", SearchMode::FirstMatch).unwrap();
        assert_eq!(files[0].table["name"].as_str(), Some("low"));
    }

    #[test]
    fn nothing_found_is_empty() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        assert!(load_config_files(&dirs, "app.toml", SearchMode::Merge).unwrap().is_empty());
        assert!(
            load_config_files(&dirs, "app.toml", SearchMode::FirstMatch)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn syntax_error_carries_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "port = = 3\n");
        let dirs = vec![dir.path().to_path_buf()];
        match load_config_files(&dirs, "app.toml", SearchMode::Merge) {
            Err(FlagfigError::ParseError { path, .. }) => {
                assert_eq!(path, dir.path().join("app.toml"));
            }
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "port = 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; only check when the permission bites.
        if fs::read_to_string(&path).is_err() {
            let dirs = vec![dir.path().to_path_buf()];
            let result = load_config_files(&dirs, "app.toml", SearchMode::Merge);
            assert!(matches!(result, Err(FlagfigError::IoError { .. })));
        }

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn ancestors_root_ends_at_start() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();

        let dirs = expand_ancestors(&deep, &Boundary::Root);
        assert_eq!(dirs.last(), Some(&deep));
        assert!(dirs.contains(&dir.path().to_path_buf()));
        for pair in dirs.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
        }
    }

    #[test]
    fn ancestors_marker_stops_walk() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("repo").join("src").join("bin");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir(dir.path().join("repo").join(".git")).unwrap();

        let dirs = expand_ancestors(&deep, &Boundary::Marker(".git"));
        assert_eq!(dirs.first(), Some(&dir.path().join("repo")));
        assert_eq!(dirs.len(), 3);
        assert!(!dirs.contains(&dir.path().to_path_buf()));
    }

    #[test]
    fn missing_marker_walks_to_root() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("x");
        fs::create_dir_all(&deep).unwrap();
        let dirs = expand_ancestors(&deep, &Boundary::Marker(".flagfig-absent"));
        assert!(dirs.contains(&dir.path().to_path_buf()));
    }

    #[test]
    fn expand_mixes_explicit_and_ancestors() {
        let explicit = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        let deep = tree.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir(tree.path().join("a").join(".marker")).unwrap();

        let paths = vec![
            SearchPath::Path(explicit.path().to_path_buf()),
            SearchPath::Ancestors(Boundary::Marker(".marker")),
        ];
        let dirs = expand_search_paths(&paths, "test", Some(&deep));
        assert_eq!(
            dirs,
            vec![
                explicit.path().to_path_buf(),
                tree.path().join("a"),
                deep.clone(),
            ]
        );
    }

    #[test]
    fn nearest_ancestor_wins_first_match() {
        let root = TempDir::new().unwrap();
        let mid = root.path().join("mid");
        let deep = mid.join("deep");
        fs::create_dir_all(&deep).unwrap();
        write(root.path(), "name = \"root\"\n");
        write(&mid, "name = \"mid\"\n");

        let dirs = expand_ancestors(&deep, &Boundary::Root);
        let files = load_config_files(&dirs, "app.toml", SearchMode::FirstMatch).unwrap();
        assert_eq!(files[0].table["name"].as_str(), Some("mid"));
    }
}
