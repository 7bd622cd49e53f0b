use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PfpError, PfpResult};

/// Opaque image payload supplied by the user (photo or background upload).
///
/// Bytes are kept encoded; decoding happens only when a layer is rendered.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    label: Arc<str>,
    bytes: Arc<[u8]>,
}

impl ImageBlob {
    /// Wrap encoded image bytes under a human-readable label (usually the file name).
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let label: String = label.into();
        let bytes: Vec<u8> = bytes.into();
        Self {
            label: Arc::from(label),
            bytes: Arc::from(bytes),
        }
    }

    /// Read a blob from disk, labelled with the file name.
    pub fn from_path(path: &Path) -> PfpResult<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(label, bytes))
    }

    /// Label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("label", &self.label)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Read-only access to catalog assets by relative path.
pub trait AssetSource: Send + Sync {
    /// Return the encoded bytes stored at `rel`.
    fn read(&self, rel: &str) -> PfpResult<Vec<u8>>;
}

/// Assets resolved relative to a directory on disk.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    /// Resolve asset paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn read(&self, rel: &str) -> PfpResult<Vec<u8>> {
        let norm = normalize_rel_path(rel)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p)
            .map_err(|e| PfpError::decode(format!("failed to read asset '{}': {e}", p.display())))
    }
}

/// In-memory assets keyed by normalized relative path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the bytes stored at `rel`.
    pub fn insert(&mut self, rel: &str, bytes: impl Into<Vec<u8>>) -> PfpResult<()> {
        let key = normalize_rel_path(rel)?;
        let bytes: Vec<u8> = bytes.into();
        self.files.insert(key, Arc::from(bytes));
        Ok(())
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, rel: &str) -> PfpResult<Vec<u8>> {
        let key = normalize_rel_path(rel)?;
        self.files
            .get(&key)
            .map(|b| b.to_vec())
            .ok_or_else(|| PfpError::decode(format!("asset '{key}' not found")))
    }
}

/// Normalize and validate catalog-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PfpResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PfpError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PfpError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PfpError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PfpError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
