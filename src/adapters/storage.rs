use crate::domain::ports::Storage;
use crate::utils::error::{Result, TallyError};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage. Reads resolve against `base_path`, writes against
/// `output_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    output_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        Self {
            output_path: base_path.clone(),
            base_path,
        }
    }

    pub fn with_output_dir(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        fs::read(&full_path).map_err(|source| TallyError::SourceReadError {
            path: full_path.display().to_string(),
            source,
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.output_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
