//! Packaging of generated files.
//! - Normalizes rendered text (newlines, trailing blank lines)
//! - Normalizes paths (no absolute, no parent traversal)
//! - Writing to disk is a caller-level step, never part of generation

use crate::error::ConfigError;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// One generated source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Everything emitted for one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub files: Vec<GeneratedFile>,
}

fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&b'\r') {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
    }
}

/// Rendered templates end with exactly one newline.
pub(crate) fn tidy(rendered: &str) -> String {
    let mut out = normalize_newlines(rendered).trim_end().to_string();
    out.push('\n');
    out
}

fn sanitize_path(path: &str) -> Option<String> {
    let mut p = path.replace('\\', "/").trim().to_string();
    if p.is_empty() {
        return None;
    }
    if let Some(stripped) = p.strip_prefix("./") {
        p = stripped.to_string();
    }
    if Path::new(&p).is_absolute() {
        return None;
    }
    let has_traversal = Path::new(&p)
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    if has_traversal {
        return None;
    }
    Some(p)
}

impl Artifact {
    /// Adds `content` under `path`, replacing an earlier file with the same path.
    /// Disallowed paths are skipped with a warning.
    pub fn upsert(&mut self, path: &str, content: String) {
        let Some(path) = sanitize_path(path) else {
            warn!("Skipping invalid or disallowed output path: {}", path);
            return;
        };
        if let Some(idx) = self.files.iter().position(|f| f.path == path) {
            debug!("Replacing existing file: {}", path);
            self.files[idx].content = content;
        } else {
            debug!("Packaged generated file: {}", path);
            self.files.push(GeneratedFile { path, content });
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    /// Writes every file below `dir`, creating directories as needed.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let target = dir.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&target, &file.content).map_err(|source| ConfigError::Io {
                path: target.clone(),
                source,
            })?;
            info!("Wrote {}", target.display());
            written.push(target);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_by_path() {
        let mut artifact = Artifact::default();
        artifact.upsert("a.cpp", "one".into());
        artifact.upsert("./a.cpp", "two".into());
        artifact.upsert("b.h", "three".into());
        assert_eq!(artifact.files.len(), 2);
        assert_eq!(artifact.get("a.cpp"), Some("two"));
    }

    #[test]
    fn rejects_escaping_paths() {
        let mut artifact = Artifact::default();
        artifact.upsert("../evil.cpp", "x".into());
        artifact.upsert("/etc/evil.cpp", "x".into());
        artifact.upsert("  ", "x".into());
        assert!(artifact.files.is_empty());
    }

    #[test]
    fn tidy_normalizes_endings() {
        assert_eq!(tidy("a\r\nb\r\n\n\n"), "a\nb\n");
        assert_eq!(tidy(""), "\n");
    }
}
