//! Persisting generated artifacts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::codegen::GeneratedArtifact;
use crate::error::WriteError;

/// Destination for generated artifacts.
///
/// Within one invocation a writer never accepts two different contents for
/// the same target.
pub trait ArtifactWriter {
    /// Persists `artifact` and returns where it ended up.
    fn write(&mut self, artifact: &GeneratedArtifact) -> Result<PathBuf, WriteError>;
}

impl<W: ArtifactWriter + ?Sized> ArtifactWriter for &mut W {
    fn write(&mut self, artifact: &GeneratedArtifact) -> Result<PathBuf, WriteError> {
        (**self).write(artifact)
    }
}

/// Writes artifacts below a root directory, creating directories as needed.
#[derive(Debug)]
pub struct FsWriter {
    root: PathBuf,
    written: HashMap<PathBuf, String>,
}

impl FsWriter {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            written: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactWriter for FsWriter {
    fn write(&mut self, artifact: &GeneratedArtifact) -> Result<PathBuf, WriteError> {
        let path = self.root.join(&artifact.target);

        if let Some(previous) = self.written.get(&path) {
            if *previous != artifact.contents {
                return Err(WriteError::Conflict { path });
            }
            return Ok(path);
        }

        let io_error = |source| WriteError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&path, &artifact.contents).map_err(io_error)?;

        debug!("Wrote {} ({} bytes)", path.display(), artifact.contents.len());
        self.written.insert(path.clone(), artifact.contents.clone());
        Ok(path)
    }
}

/// Keeps artifacts in memory, keyed by target. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: impl AsRef<Path>) -> Option<&str> {
        self.files.get(target.as_ref()).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArtifactWriter for MemoryWriter {
    fn write(&mut self, artifact: &GeneratedArtifact) -> Result<PathBuf, WriteError> {
        match self.files.get(&artifact.target) {
            Some(existing) if *existing != artifact.contents => Err(WriteError::Conflict {
                path: artifact.target.clone(),
            }),
            Some(_) => Ok(artifact.target.clone()),
            None => {
                self.files
                    .insert(artifact.target.clone(), artifact.contents.clone());
                Ok(artifact.target.clone())
            }
        }
    }
}
