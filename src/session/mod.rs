// Previous-session marker - the last working directory, shown to the user
// by the welcome window on the next launch

use std::fs;

use tracing::warn;

use crate::resource::{AppPaths, ResourceError};

/// Returned when no marker file exists: "start in the current directory".
pub const SESSION_SENTINEL: &str = ".";

/// Reads the marker file. Multi-line content is concatenated without
/// separators and passed to the UI verbatim; an absent or unreadable file
/// yields the sentinel.
pub fn read_info(paths: &AppPaths) -> String {
    let file = paths.prev_session_file();
    if !file.is_file() {
        return SESSION_SENTINEL.to_string();
    }

    match fs::read_to_string(&file) {
        Ok(text) => text.lines().collect(),
        Err(e) => {
            warn!(path = %file.display(), error = %e, "could not read session marker");
            SESSION_SENTINEL.to_string()
        }
    }
}

/// Overwrites the marker for the next run. The UI shell calls this whenever
/// the working directory changes.
pub fn remember(paths: &AppPaths, dir: &str) -> Result<(), ResourceError> {
    let file = paths.prev_session_file();
    fs::write(&file, dir).map_err(|source| ResourceError::Write { path: file, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_marker_content_returned_verbatim() {
        let tmp = tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());
        std::fs::write(paths.prev_session_file(), "/home/user/music").unwrap();

        assert_eq!(read_info(&paths), "/home/user/music");
    }

    #[test]
    fn test_absent_marker_yields_sentinel() {
        let tmp = tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());

        assert_eq!(read_info(&paths), SESSION_SENTINEL);
    }

    #[test]
    fn test_multiline_marker_concatenates_without_separators() {
        let tmp = tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());
        std::fs::write(paths.prev_session_file(), "/home/user\n/music\n").unwrap();

        assert_eq!(read_info(&paths), "/home/user/music");
    }

    #[test]
    fn test_remember_overwrites_marker() {
        let tmp = tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());

        remember(&paths, "/first").unwrap();
        remember(&paths, "/second").unwrap();
        assert_eq!(read_info(&paths), "/second");
    }
}
