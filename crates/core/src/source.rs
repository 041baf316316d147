//! Source provider abstraction for filesystem-independent conversion.
//!
//! [`convert_file`](crate::convert_file) reads through a [`SourceProvider`]
//! so that callers and tests can convert sources that never touch the disk.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::ConvertError;

/// Reads program source text by path.
pub trait SourceProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;
}

/// Reads from the real filesystem.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }
}

/// In-memory source provider for embedding and testing.
///
/// Paths are normalized on insertion and lookup, so `a/./b/../c.java` and
/// `a/c.java` name the same file.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        let files = files
            .into_iter()
            .map(|(path, text)| (normalize_path(&path), text))
            .collect();
        Self { files }
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(normalize_path(path.as_ref()), text.into());
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Read `path` through `provider`, mapping failures to [`ConvertError::Io`].
pub fn read_with(provider: &dyn SourceProvider, path: &Path) -> Result<String, ConvertError> {
    provider
        .read_source(path)
        .map_err(|e| ConvertError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_resolves_dot_and_dotdot() {
        let p = Path::new("/a/b/../c/./d.java");
        assert_eq!(normalize_path(p), PathBuf::from("/a/c/d.java"));
    }

    #[test]
    fn in_memory_lookup_is_normalized() {
        let mut provider = InMemoryProvider::default();
        provider.insert("/src/./Shape.java", "abstract double area();");
        let text = provider
            .read_source(Path::new("/src/util/../Shape.java"))
            .unwrap();
        assert_eq!(text, "abstract double area();");
    }

    #[test]
    fn missing_file_becomes_io_error() {
        let provider = InMemoryProvider::default();
        let err = read_with(&provider, Path::new("/missing.java")).unwrap_err();
        match err {
            ConvertError::Io { path, message } => {
                assert_eq!(path, "/missing.java");
                assert!(message.contains("not found"));
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
