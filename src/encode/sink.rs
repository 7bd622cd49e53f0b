use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::PfpResult;

/// File name every export is delivered under.
pub const EXPORT_FILE_NAME: &str = "re-protocol-pfp.png";

/// Destination for a finished export, the stand-in for a browser download.
///
/// `deliver` is only called with a fully encoded PNG; a failed export never reaches the sink.
pub trait DownloadSink {
    /// Hand over the encoded file.
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> PfpResult<()>;
}

/// Writes downloads into a directory.
///
/// The file is written under a temporary name and renamed into place, so readers never observe
/// a partially written PNG.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    last: Option<PathBuf>,
}

impl FileSink {
    /// Deliver into `dir` (created on first delivery).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last: None,
        }
    }

    /// Path of the most recent delivery.
    pub fn last_path(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}

impl DownloadSink for FileSink {
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> PfpResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let dst = self.dir.join(file_name);
        let tmp = self.dir.join(format!(".{file_name}.partial"));
        std::fs::write(&tmp, png).with_context(|| format!("write '{}'", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &dst) {
            let _ = std::fs::remove_file(&tmp);
            return Err(anyhow::Error::new(e)
                .context(format!("move export into '{}'", dst.display()))
                .into());
        }
        self.last = Some(dst);
        Ok(())
    }
}

/// Keeps downloads in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// `(file_name, png)` in delivery order.
    pub(crate) files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered files in order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }
}

impl DownloadSink for InMemorySink {
    fn deliver(&mut self, file_name: &str, png: &[u8]) -> PfpResult<()> {
        self.files.push((file_name.to_owned(), png.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
