use std::fs;
use tracing::{error, info};

use crate::error::EmitError;

/// Everything before the last `/`, or `None` when the path has no directory
/// component.
pub fn parent_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

/// Record of one annotated block that was materialised (or would have been,
/// under dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: String,
    pub bytes: usize,
    pub written: bool,
}

/// Writes block content to its annotated destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter {
    dry_run: bool,
}

impl Emitter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Creates the parent directory chain of `path` and replaces the file
    /// with `content`. Directories created before a failed write are left in
    /// place.
    pub fn emit(&self, path: &str, content: &[u8]) -> Result<EmittedFile, EmitError> {
        let Some(dir) = parent_dir(path) else {
            error!(path, "annotated path has no directory component");
            return Err(EmitError::Path {
                path: path.to_string(),
            });
        };

        if self.dry_run {
            info!(path, bytes = content.len(), "dry run, skipping write");
            return Ok(EmittedFile {
                path: path.to_string(),
                bytes: content.len(),
                written: false,
            });
        }

        info!(path, "writing to file");
        fs::create_dir_all(dir).map_err(|source| {
            error!(dir, error = %source, "error creating directories");
            EmitError::CreateDirectory {
                dir: dir.to_string(),
                source,
            }
        })?;

        fs::write(path, content).map_err(|source| {
            error!(path, error = %source, "error writing file");
            EmitError::Write {
                path: path.to_string(),
                source,
            }
        })?;

        info!(path, bytes = content.len(), "file written successfully");
        Ok(EmittedFile {
            path: path.to_string(),
            bytes: content.len(),
            written: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn parent_dir_uses_last_separator() {
        assert_eq!(parent_dir("src/bin/main.rs"), Some("src/bin"));
        assert_eq!(parent_dir("/abs.txt"), Some(""));
        assert_eq!(parent_dir("dir/"), Some("dir"));
        assert_eq!(parent_dir("main.rs"), None);
        assert_eq!(parent_dir(""), None);
        assert_eq!(parent_dir("win\\style.txt"), None);
    }

    #[test]
    fn creates_missing_directories_and_overwrites() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a/b/c.txt");
        let target_str = target.to_str().unwrap();
        let emitter = Emitter::new(false);

        emitter.emit(target_str, b"first version\n").unwrap();
        let outcome = emitter.emit(target_str, b"v2").unwrap();

        assert!(outcome.written);
        assert_eq!(outcome.bytes, 2);
        assert_eq!(fs::read_to_string(&target).unwrap(), "v2");
    }

    #[test]
    fn bare_filename_is_rejected() {
        let err = Emitter::new(false).emit("plain.txt", b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");

        let outcome = Emitter::new(true)
            .emit(target.to_str().unwrap(), b"data")
            .unwrap();

        assert!(!outcome.written);
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn directory_blocked_by_file_fails_to_create() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "").unwrap();
        let target = dir.path().join("blocker/inner/out.txt");

        let err = Emitter::new(false)
            .emit(target.to_str().unwrap(), b"data")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CreateDirectory);
    }

    #[test]
    fn writing_over_a_directory_fails() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out/existing");
        fs::create_dir_all(&target).unwrap();

        let err = Emitter::new(false)
            .emit(target.to_str().unwrap(), b"data")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Write);
    }
}
