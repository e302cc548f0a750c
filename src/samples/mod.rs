//! Translation samples
//!
//! A sample is a source file and the translation it is expected to produce,
//! stored side by side in one directory:
//!
//! ```text
//! samples/
//!   point.rs            source
//!   point.expected.cs   expected translation
//! ```
//!
//! [`SampleStore`] lists, loads, saves and deletes these pairs; [`validate`]
//! compares a fresh translation against an expected text.

pub mod validate;

pub use validate::{check, validate, Bindings, Mismatch};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SOURCE_EXTENSION: &str = ".rs";
const EXPECTED_EXTENSION: &str = ".expected.cs";

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Invalid sample name '{0}'")]
    InvalidName(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source text and the translation it should produce
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sample {
    pub source: String,
    pub expected: String,
}

/// Directory of `<name>.rs` / `<name>.expected.cs` pairs
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: PathBuf,
}

impl SampleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SampleStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sample names in lexical order
    pub fn list(&self) -> Result<Vec<String>, SampleError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| self.io_error(&self.dir, source))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.io_error(&self.dir, source))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(SOURCE_EXTENSION) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// A missing expected file loads as an empty expectation
    pub fn load(&self, name: &str) -> Result<Sample, SampleError> {
        let (source_path, expected_path) = self.paths(name)?;
        let source = fs::read_to_string(&source_path).map_err(|source| self.io_error(&source_path, source))?;
        let expected = match fs::read_to_string(&expected_path) {
            Ok(expected) => expected,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(self.io_error(&expected_path, err)),
        };
        Ok(Sample { source, expected })
    }

    pub fn save(&self, name: &str, sample: &Sample) -> Result<(), SampleError> {
        let (source_path, expected_path) = self.paths(name)?;
        fs::create_dir_all(&self.dir).map_err(|source| self.io_error(&self.dir, source))?;
        fs::write(&source_path, &sample.source).map_err(|source| self.io_error(&source_path, source))?;
        fs::write(&expected_path, &sample.expected).map_err(|source| self.io_error(&expected_path, source))?;
        tracing::debug!(name, dir = %self.dir.display(), "sample saved");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), SampleError> {
        let (source_path, expected_path) = self.paths(name)?;
        fs::remove_file(&source_path).map_err(|source| self.io_error(&source_path, source))?;
        match fs::remove_file(&expected_path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(self.io_error(&expected_path, err)),
        }
        tracing::debug!(name, dir = %self.dir.display(), "sample deleted");
        Ok(())
    }

    fn paths(&self, name: &str) -> Result<(PathBuf, PathBuf), SampleError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains(std::path::MAIN_SEPARATOR);
        if !valid {
            return Err(SampleError::InvalidName(name.to_string()));
        }
        Ok((
            self.dir.join(format!("{}{}", name, SOURCE_EXTENSION)),
            self.dir.join(format!("{}{}", name, EXPECTED_EXTENSION)),
        ))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> SampleError {
        SampleError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_names_with_separators() {
        let store = SampleStore::new("samples");
        assert!(matches!(store.load(""), Err(SampleError::InvalidName(_))));
        assert!(matches!(store.load("../secret"), Err(SampleError::InvalidName(_))));
        assert!(matches!(store.delete(".."), Err(SampleError::InvalidName(_))));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let store = SampleStore::new("/nonexistent/rustsharp-samples");
        let err = store.list().unwrap_err();
        assert!(matches!(err, SampleError::Io { .. }));
        assert!(err.to_string().starts_with("/nonexistent/rustsharp-samples: "));
    }
}
