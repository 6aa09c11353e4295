//! Content source abstraction for reading bus documents.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Trait for abstracting file I/O, so documents can come from disk or memory.
pub trait ContentSource {
    /// Read a file at the given logical path and return its content as a string.
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String>;
    /// List files in a directory path (logical path for the source), returning full paths.
    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>>;
}

/// Reads files directly from the local filesystem.
pub struct FsSource;

impl ContentSource for FsSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path.as_std_path()).with_context(|| format!("Failed to read {}", path))
    }

    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut files = Vec::new();
        for entry in
            std::fs::read_dir(path.as_std_path()).with_context(|| format!("Read dir {}", path))?
        {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let p = Utf8PathBuf::from_path_buf(entry.path())
                    .map_err(|_| anyhow::anyhow!("Non-UTF8 path in {}", path))?;
                files.push(p);
            }
        }
        files.sort();
        Ok(files)
    }
}
