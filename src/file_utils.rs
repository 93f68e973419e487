use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Check a path's extension against a list such as `[".mkv", "mp4"]`, ignoring case
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        let Some(ext) = path.as_ref().extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }

    /// Find video files below a directory, depth first and sorted by name
    ///
    /// Entries that cannot be read are skipped with a warning.
    pub fn find_video_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Vec<PathBuf> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_file() && Self::has_extension(path, extensions) {
                result.push(path.to_path_buf());
            }
        }

        result
    }

    // @returns: (file name, name of the containing folder)
    pub fn file_and_folder_names<P: AsRef<Path>>(path: P) -> (String, String) {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let folder_name = path
            .parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        (file_name, folder_name)
    }

    /// Directory whose sidecar belongs to a media file
    pub fn containing_dir<P: AsRef<Path>>(path: P) -> PathBuf {
        match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write a string to a file, replacing its content
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }
}
