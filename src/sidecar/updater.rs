use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_config::SidecarConfig;
use crate::errors::SidecarError;
use crate::file_utils::FileManager;
use crate::sidecar::document::NfoDocument;
use crate::sidecar::encoding::decode_document;

/// Result of inserting one tag into a sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag was written to disk
    Added,
    /// Dry run: the tag would have been written
    WouldAdd,
    /// The sidecar already holds the tag, nothing to do
    AlreadyPresent,
}

impl TagOutcome {
    /// Whether an insertion happened, real or simulated
    pub fn inserted(&self) -> bool {
        matches!(self, TagOutcome::Added | TagOutcome::WouldAdd)
    }
}

/// Inserts tags into the sidecar file of a media directory
///
/// The sidecar is read from disk for every insertion; nothing is cached
/// between calls, so repeated and reordered insertions converge.
#[derive(Debug, Clone)]
pub struct SidecarUpdater {
    file_name: String,
    root_element: String,
    dry_run: bool,
}

impl SidecarUpdater {
    pub fn new(file_name: &str, root_element: &str, dry_run: bool) -> Self {
        Self {
            file_name: file_name.to_string(),
            root_element: root_element.to_string(),
            dry_run,
        }
    }

    pub fn from_config(config: &SidecarConfig, dry_run: bool) -> Self {
        Self::new(&config.file_name, &config.root_element, dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Path of the sidecar belonging to a directory
    pub fn sidecar_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Load the sidecar at `path`
    ///
    /// A missing file yields a fresh document. The bytes are decoded using the
    /// byte order mark or the declared encoding. Content that does not decode
    /// or parse is discarded and replaced by a fresh document as well; only an
    /// unreadable file is an error.
    pub fn load(&self, path: &Path) -> Result<NfoDocument, SidecarError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(NfoDocument::new(&self.root_element));
            }
            Err(source) => {
                return Err(SidecarError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let parsed = decode_document(&bytes).and_then(|xml| NfoDocument::parse(&xml));

        match parsed {
            Ok(document) => Ok(document),
            Err(e) => {
                debug!("Discarding unparseable sidecar {:?}: {}", path, e);
                Ok(NfoDocument::new(&self.root_element))
            }
        }
    }

    /// Insert `tag` into the sidecar of `dir` unless it is already there
    pub fn add_tag(&self, dir: &Path, tag: &str) -> Result<TagOutcome, SidecarError> {
        let path = self.sidecar_path(dir);
        let mut document = self.load(&path)?;

        if !document.add_tag(tag) {
            return Ok(TagOutcome::AlreadyPresent);
        }

        if self.dry_run {
            return Ok(TagOutcome::WouldAdd);
        }

        let xml = document.to_xml()?;
        FileManager::write_to_file(&path, &xml).map_err(|source| SidecarError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote tag '{}' to {:?}", tag, path);

        Ok(TagOutcome::Added)
    }
}
