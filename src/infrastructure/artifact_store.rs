use crate::domain::errors::PredictionError;
use crate::domain::ports::{ArtifactName, ArtifactStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Artifacts stored as JSON files under one directory.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: ArtifactName) -> PathBuf {
        self.dir.join(name.file_name())
    }
}

impl ArtifactStore for FileArtifactStore {
    fn read(&self, name: ArtifactName) -> Result<Vec<u8>, PredictionError> {
        let path = self.path_of(name);
        debug!("FileArtifactStore: reading {}", path.display());
        fs::read(&path).map_err(|e| PredictionError::ModelLoad {
            artifact: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write(&self, name: ArtifactName, bytes: &[u8]) -> Result<(), PredictionError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            PredictionError::model(format!("cannot create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_of(name);
        fs::write(&path, bytes)
            .map_err(|e| PredictionError::model(format!("cannot write {}: {}", path.display(), e)))?;
        info!("FileArtifactStore: wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}
