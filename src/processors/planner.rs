// webpbatch/src/processors/planner.rs
use crate::core::{ConvertError, ImageCandidate, Result};
use crate::utils::flat_file_name;
use std::path::{Path, PathBuf};

/// Prefix of holding folders created next to scanned directories.
pub const HOLDING_PREFIX: &str = "Temp";

/// Where outputs and relocated originals go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One output root and one holding root for the whole batch (uploads).
    Shared {
        output_root: PathBuf,
        holding_root: PathBuf,
    },
    /// Output next to each source file; originals go to `Temp<dir>` beside
    /// the source directory (directory scan).
    Alongside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub webp_path: PathBuf,
    pub holding_path: PathBuf,
}

impl Destination {
    pub fn webp_name(&self) -> String {
        self.webp_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct DestinationPlanner {
    layout: Layout,
}

impl DestinationPlanner {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn shared<P: Into<PathBuf>, Q: Into<PathBuf>>(output_root: P, holding_root: Q) -> Self {
        Self::new(Layout::Shared {
            output_root: output_root.into(),
            holding_root: holding_root.into(),
        })
    }

    pub fn alongside() -> Self {
        Self::new(Layout::Alongside)
    }

    /// `output_root/<stem>.webp`. Only the last extension is stripped.
    pub fn plan_output(original_name: &str, output_root: &Path) -> PathBuf {
        let file_name = flat_file_name(original_name);
        let stem = match Path::new(&file_name).file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => file_name.clone(),
        };
        output_root.join(format!("{}.webp", stem))
    }

    /// `holding_root/<file name>`. A later relocation with the same name overwrites.
    pub fn plan_holding(original_name: &str, holding_root: &Path) -> PathBuf {
        holding_root.join(flat_file_name(original_name))
    }

    /// Holding folder for files found in `dir`: its sibling `Temp<dir name>`.
    /// A directory without a name (`/`) has no such sibling.
    pub fn holding_dir_for(dir: &Path) -> Result<PathBuf> {
        let (Some(dir_name), Some(parent)) = (dir.file_name(), dir.parent()) else {
            return Err(ConvertError::Directory {
                path: dir.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "directory has no name to derive a holding folder from",
                ),
            });
        };
        Ok(parent.join(format!("{}{}", HOLDING_PREFIX, dir_name.to_string_lossy())))
    }

    pub fn plan(&self, candidate: &ImageCandidate) -> Result<Destination> {
        match &self.layout {
            Layout::Shared {
                output_root,
                holding_root,
            } => Ok(Destination {
                webp_path: Self::plan_output(&candidate.name, output_root),
                holding_path: Self::plan_holding(&candidate.name, holding_root),
            }),
            Layout::Alongside => {
                let dir = candidate.source_dir().ok_or_else(|| {
                    ConvertError::InvalidParameter(format!(
                        "{} has no source directory",
                        candidate.name
                    ))
                })?;
                Ok(Destination {
                    webp_path: Self::plan_output(&candidate.name, dir),
                    holding_path: Self::plan_holding(&candidate.name, &Self::holding_dir_for(dir)?),
                })
            }
        }
    }

    /// Shared roots that must exist before a batch starts. Empty for scans.
    pub fn prepare(&self, with_holding: bool) -> Result<()> {
        if let Layout::Shared {
            output_root,
            holding_root,
        } = &self.layout
        {
            ensure_dir(output_root)?;
            if with_holding {
                ensure_dir(holding_root)?;
            }
        }
        Ok(())
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ConvertError::Directory {
        path: path.to_path_buf(),
        source,
    })
}
