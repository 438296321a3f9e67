//! Atomic writes for the context file

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes a file through a temporary sibling and a rename
pub struct AtomicFileWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
}

impl AtomicFileWriter {
    /// Create a writer for the target path
    pub fn new(target_path: &Path) -> io::Result<Self> {
        let temp_path = Self::generate_temp_path(target_path)?;

        Ok(AtomicFileWriter {
            target_path: target_path.to_path_buf(),
            temp_path,
        })
    }

    /// Write content and move it into place
    pub fn write_content(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.target_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.temp_path, content)?;
        fs::rename(&self.temp_path, &self.target_path)
    }

    fn generate_temp_path(target: &Path) -> io::Result<PathBuf> {
        let filename = target.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Context path has no file name: {}", target.display()),
            )
        })?;

        let temp_name = format!("{}.tmp.{}", filename.to_string_lossy(), Uuid::new_v4());

        Ok(match target.parent() {
            Some(parent) => parent.join(temp_name),
            None => PathBuf::from(temp_name),
        })
    }
}

impl Drop for AtomicFileWriter {
    fn drop(&mut self) {
        if self.temp_path.exists() {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Atomically write string content to a file
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    AtomicFileWriter::new(path)?.write_content(content)
}
