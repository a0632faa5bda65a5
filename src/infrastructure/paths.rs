//! Filesystem locations used by bookfinder.
//!
//! Everything persisted lives under one data directory: the library store and
//! the span export file. The default comes from the platform data directory
//! (`~/.local/share/bookfinder` on Linux); configuration can override it.

use std::path::{Path, PathBuf};

/// Name of the library store file inside the data directory.
pub const LIBRARY_FILE: &str = "library.json";

/// Name of the span export file inside the data directory.
pub const SPANS_FILE: &str = "bookfinder-spans.jsonl";

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Returns the default data directory for bookfinder storage.
///
/// Falls back to `./.bookfinder` when the platform has no data directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".bookfinder"), |dir| dir.join("bookfinder"))
}

/// Default configuration file (`~/.config/bookfinder/config.toml` on Linux).
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookfinder").join(CONFIG_FILE))
}

/// Expands a leading `~` to the user's home directory.
///
/// # Examples
///
/// ```
/// use bookfinder::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}

/// Path of the library store.
#[must_use]
pub fn library_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LIBRARY_FILE)
}

/// Path of the span export file.
#[must_use]
pub fn spans_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SPANS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/books"), home.join("books"));
        }
        assert_eq!(expand_tilde("~other/x"), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_files_live_under_data_dir() {
        let dir = Path::new("/tmp/bf");
        assert_eq!(library_file(dir), PathBuf::from("/tmp/bf/library.json"));
        assert_eq!(spans_file(dir), PathBuf::from("/tmp/bf/bookfinder-spans.jsonl"));
    }
}
