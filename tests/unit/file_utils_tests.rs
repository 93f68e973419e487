/*!
 * Tests for file system utilities
 */

use anyhow::Result;
use std::path::{Path, PathBuf};

use langtagger::app_config::Config;
use langtagger::file_utils::FileManager;
use crate::common;

fn video_extensions() -> Vec<String> {
    Config::default().video_extensions
}

/// Test file and directory existence checks
#[test]
fn test_exists_withFileAndDirectory_shouldDistinguishKinds() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    Ok(())
}

#[test]
fn test_has_extension_withMixedCase_shouldMatchIgnoringCase() {
    let extensions = video_extensions();

    assert!(FileManager::has_extension("Movie.mkv", &extensions));
    assert!(FileManager::has_extension("Movie.MKV", &extensions));
    assert!(FileManager::has_extension("clip.Mp4", &extensions));
    assert!(!FileManager::has_extension("movie.nfo", &extensions));
    assert!(!FileManager::has_extension("README", &extensions));
    assert!(FileManager::has_extension("a.mkv", &["mkv".to_string()]));
}

/// Only video files are found, in sorted depth-first order
#[test]
fn test_find_video_files_withNestedTree_shouldReturnSortedVideos() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_video_file(root, "Movies/B/b.mkv")?;
    common::create_video_file(root, "Movies/A/a.mp4")?;
    common::create_video_file(root, "Movies/A/z.AVI")?;
    common::create_test_file(root, "Movies/A/movie.nfo", "<movie/>")?;
    common::create_test_file(root, "Movies/A/cover.jpg", "")?;

    let files = FileManager::find_video_files(root, &video_extensions());

    let relative: Vec<PathBuf> = files
        .iter()
        .map(|f| f.strip_prefix(root).map(Path::to_path_buf))
        .collect::<Result<_, _>>()?;
    assert_eq!(
        relative,
        vec![
            PathBuf::from("Movies/A/a.mp4"),
            PathBuf::from("Movies/A/z.AVI"),
            PathBuf::from("Movies/B/b.mkv"),
        ]
    );
    Ok(())
}

#[test]
fn test_find_video_files_withEmptyDirectory_shouldReturnNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::find_video_files(temp_dir.path(), &video_extensions()).is_empty());
    Ok(())
}

/// A directory named like a video is not a video
#[test]
fn test_find_video_files_withVideoNamedDirectory_shouldSkipIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    std::fs::create_dir_all(temp_dir.path().join("Odd.mkv"))?;
    common::create_video_file(temp_dir.path(), "Odd.mkv/inner.mkv")?;

    let files = FileManager::find_video_files(temp_dir.path(), &video_extensions());

    assert_eq!(files, vec![temp_dir.path().join("Odd.mkv/inner.mkv")]);
    Ok(())
}

#[test]
fn test_file_and_folder_names_withNestedPath_shouldReturnLastComponents() {
    let (file, folder) = FileManager::file_and_folder_names("/media/Filme Deutsch/Movie.mkv");
    assert_eq!(file, "Movie.mkv");
    assert_eq!(folder, "Filme Deutsch");

    let (file, folder) = FileManager::file_and_folder_names("Movie.mkv");
    assert_eq!(file, "Movie.mkv");
    assert_eq!(folder, "");
}

#[test]
fn test_containing_dir_withBareFileName_shouldUseCurrentDirectory() {
    assert_eq!(FileManager::containing_dir("Movie.mkv"), PathBuf::from("."));
    assert_eq!(FileManager::containing_dir("Foo/Movie.mkv"), PathBuf::from("Foo"));
}

#[test]
fn test_write_to_file_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "movie.nfo", "old content")?;

    FileManager::write_to_file(&path, "new")?;

    assert_eq!(std::fs::read_to_string(&path)?, "new");
    Ok(())
}
