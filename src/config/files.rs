//! Config file resolution.
//!
//! The installed (canonical) file is replaced by a same-named file in the
//! working directory when that file exists and is non-empty.

use crate::error::{ConfigError, Result};
use crate::logging::{ExecutionContext, advise};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why a file was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    /// A non-empty local copy took precedence.
    Override,
    /// The installed path was used.
    Canonical,
}

impl std::fmt::Display for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSource::Override => write!(f, "override"),
            FileSource::Canonical => write!(f, "canonical"),
        }
    }
}

/// The chosen config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub source: FileSource,
}

/// Picks between the installed config file and a local override.
#[derive(Debug, Clone)]
pub struct FileResolver {
    canonical: PathBuf,
    working_dir: Option<PathBuf>,
    context: ExecutionContext,
}

impl FileResolver {
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self {
            canonical: canonical.into(),
            working_dir: None,
            context: ExecutionContext::Service,
        }
    }

    /// Look for the override in `dir` instead of the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn canonical_path(&self) -> &Path {
        &self.canonical
    }

    /// Path of the override candidate, if the canonical path has a file name.
    pub fn local_path(&self) -> Option<PathBuf> {
        let name = self.canonical.file_name()?;
        Some(match self.working_dir {
            Some(ref dir) => dir.join(name),
            None => PathBuf::from(name),
        })
    }

    /// Choose a path without opening it.
    pub fn choose(&self) -> ResolvedFile {
        if let Some(local) = self.local_path()
            && is_non_empty_file(&local)
        {
            return ResolvedFile {
                path: local,
                source: FileSource::Override,
            };
        }
        ResolvedFile {
            path: self.canonical.clone(),
            source: FileSource::Canonical,
        }
    }

    /// Resolve and open the config file.
    ///
    /// Falls back to the canonical path if the override cannot be opened.
    pub fn open(&self) -> Result<(ResolvedFile, File)> {
        let chosen = self.choose();

        if chosen.source == FileSource::Override {
            match File::open(&chosen.path) {
                Ok(file) => {
                    let name = chosen
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    advise(
                        self.context,
                        &format!("Warning, overriding installed {} file with local copy", name),
                    );
                    return Ok((chosen, file));
                }
                Err(e) => {
                    debug!(path = %chosen.path.display(), error = %e, "Override unreadable, using installed file");
                }
            }
        }

        let unavailable = || ConfigError::FileUnavailable {
            canonical: self.canonical.clone(),
            local: self.local_path().unwrap_or_default(),
        };
        if !is_regular_file(&self.canonical) {
            return Err(unavailable());
        }
        let file = File::open(&self.canonical).map_err(|_| unavailable())?;
        debug!(path = %self.canonical.display(), "Using installed config file");
        Ok((
            ResolvedFile {
                path: self.canonical.clone(),
                source: FileSource::Canonical,
            },
            file,
        ))
    }

    /// Resolve the config file, verifying it can be opened.
    pub fn resolve(&self) -> Result<ResolvedFile> {
        self.open().map(|(resolved, _file)| resolved)
    }
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
