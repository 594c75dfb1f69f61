// webpbatch/src/core/candidate.rs
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Where a candidate's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// A file on disk (scanned or staged by the upload layer).
    File(PathBuf),
    /// An upload kept in memory.
    Memory(Vec<u8>),
}

/// One input proposed for conversion. Building one never touches the
/// filesystem; sizes come from the bytes the job reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub name: String,
    pub source: CandidateSource,
    pub mime_type: Option<String>,
}

impl ImageCandidate {
    /// Builds a candidate for a file on disk. The name is the file name and the
    /// MIME type is inferred from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            mime_type: infer_mime_type(&name),
            name,
            source: CandidateSource::File(path.to_path_buf()),
        }
    }

    /// Builds a candidate for a file staged on disk under a different name than
    /// the one the client supplied.
    pub fn staged<P: Into<PathBuf>>(
        name: impl Into<String>,
        mime_type: Option<String>,
        path: P,
    ) -> Self {
        Self {
            name: name.into(),
            source: CandidateSource::File(path.into()),
            mime_type,
        }
    }

    pub fn from_memory(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: CandidateSource::Memory(bytes),
            mime_type,
        }
    }

    /// Directory holding the source file, if the candidate lives on disk.
    pub fn source_dir(&self) -> Option<&Path> {
        match &self.source {
            CandidateSource::File(path) => path.parent(),
            CandidateSource::Memory(_) => None,
        }
    }

    pub fn read_bytes(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.source {
            CandidateSource::File(path) => std::fs::read(path).map(Cow::Owned),
            CandidateSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    /// Moves the original bytes to `destination`, replacing any file already there.
    pub fn relocate(&self, destination: &Path) -> std::io::Result<()> {
        match &self.source {
            CandidateSource::File(path) => move_file(path, destination),
            CandidateSource::Memory(bytes) => std::fs::write(destination, bytes),
        }
    }
}

fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    // rename fails across filesystems; fall back to copy + remove
    if let Err(err) = std::fs::rename(from, to) {
        if std::fs::copy(from, to).is_err() {
            return Err(err);
        }
        std::fs::remove_file(from)?;
    }
    Ok(())
}

pub fn infer_mime_type(name: &str) -> Option<String> {
    image::ImageFormat::from_path(name)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}
