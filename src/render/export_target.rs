use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::EncodedImage;

/// Destination for exported images (download prompt, disk, memory).
pub trait ExportTarget {
    fn deliver(&mut self, file_name: &str, image: EncodedImage) -> ChartResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub image: EncodedImage,
}

/// Keeps every delivered export; handy for tests and web hosts that hand the
/// bytes to the browser themselves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExportTarget {
    files: Vec<ExportedFile>,
}

impl InMemoryExportTarget {
    #[must_use]
    pub fn files(&self) -> &[ExportedFile] {
        &self.files
    }

    #[must_use]
    pub fn last(&self) -> Option<&ExportedFile> {
        self.files.last()
    }

    pub fn take(&mut self) -> Vec<ExportedFile> {
        std::mem::take(&mut self.files)
    }
}

impl ExportTarget for InMemoryExportTarget {
    fn deliver(&mut self, file_name: &str, image: EncodedImage) -> ChartResult<()> {
        self.files.push(ExportedFile {
            file_name: file_name.to_owned(),
            image,
        });
        Ok(())
    }
}

/// Writes exports into a directory, creating it on first delivery.
#[derive(Debug, Clone)]
pub struct DirectoryExportTarget {
    dir: PathBuf,
}

impl DirectoryExportTarget {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportTarget for DirectoryExportTarget {
    fn deliver(&mut self, file_name: &str, image: EncodedImage) -> ChartResult<()> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ChartError::Export(format!(
                "export file name `{file_name}` must be a bare file name"
            )));
        }

        fs::create_dir_all(&self.dir).map_err(|err| {
            ChartError::Export(format!(
                "failed to create export dir `{}`: {err}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(file_name);
        fs::write(&path, &image.bytes).map_err(|err| {
            ChartError::Export(format!("failed to write `{}`: {err}", path.display()))
        })?;

        debug!(path = %path.display(), bytes = image.bytes.len(), "export written");
        Ok(())
    }
}
