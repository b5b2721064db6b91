//! Output directory writer.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Root of the generated site. Paths passed in are site-relative with `/`
/// separators.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Output rooted at `root`; nothing is created until the first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a site-relative path
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Write `content`, creating parent directories and overwriting any
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] naming the destination on IO failure.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        let io = |source| Error::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        std::fs::write(&path, content).map_err(io)?;
        tracing::debug!("Generated: {}", path.display());
        Ok(path)
    }

    /// Write `value` as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json<T: Serialize>(&self, relative: &str, value: &T) -> Result<PathBuf> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        let path = self.write(relative, &json)?;
        tracing::info!("Generated: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let out = OutputDir::new(dir.path());

        let path = out.write("tools/npm/aliyun/index.html", "first").unwrap();
        assert_eq!(path, dir.path().join("tools").join("npm").join("aliyun").join("index.html"));
        out.write("tools/npm/aliyun/index.html", "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let dir = TempDir::new().unwrap();
        let out = OutputDir::new(dir.path());
        let path = out.write_json("scripts/index.json", &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_write_into_file_is_error() {
        let dir = TempDir::new().unwrap();
        let out = OutputDir::new(dir.path());
        out.write("scripts", "not a directory").unwrap();
        let err = out.write("scripts/npm-aliyun.sh", "x").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
