//! File-backed tool documents.

use harbor_tool::{DocumentSource, SourceError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Document written by `init` and on first run
pub const DEFAULT_TOOLS: &str = include_str!("../assets/tools.yaml");

/// Reads the tool document from disk
///
/// A missing file is first created from [`DEFAULT_TOOLS`].
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source for a document path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Write the default document, refusing to overwrite unless forced
pub fn write_default(path: &Path, force: bool) -> io::Result<()> {
    if path.exists() && !force {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists, pass --force to overwrite", path.display()),
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_TOOLS)
}

impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        if !self.path.exists() {
            write_default(&self.path, false).map_err(|err| SourceError::new(self.describe(), err))?;
            tracing::info!(path = %self.path.display(), "wrote default tool document");
        }
        fs::read(&self.path).map_err(|err| SourceError::new(self.describe(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_tool::{load_from, MINIMUM_TOOLS_VERSION};

    #[test]
    fn test_default_document_loads() {
        let doc = harbor_tool::load_str(DEFAULT_TOOLS, MINIMUM_TOOLS_VERSION).unwrap();
        assert!(doc.tools.len() > 5);
    }

    #[test]
    fn test_file_source_bootstraps_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tools.yaml");
        let source = FileSource::new(&path);

        let doc = load_from(&source, MINIMUM_TOOLS_VERSION).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_TOOLS);
        assert!(!doc.tools.is_empty());
    }

    #[test]
    fn test_file_source_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.yaml");
        fs::write(&path, "version: v2.0.0\ntools: []\n").unwrap();

        let doc = load_from(&FileSource::new(&path), MINIMUM_TOOLS_VERSION).unwrap();
        assert!(doc.tools.is_empty());
    }

    #[test]
    fn test_file_source_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&FileSource::new(dir.path()), MINIMUM_TOOLS_VERSION).unwrap_err();
        assert!(matches!(err, harbor_tool::LoadError::Source(_)));
        assert!(!err.is_incompatible_version());
    }

    #[test]
    fn test_write_default_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.yaml");
        fs::write(&path, "custom").unwrap();

        let err = write_default(&path, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "custom");

        write_default(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_TOOLS);
    }
}
