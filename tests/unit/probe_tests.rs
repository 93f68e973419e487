/*!
 * Tests for ffprobe output parsing
 */

use anyhow::Result;
use std::path::Path;

use langtagger::errors::ProbeError;
use langtagger::probe::{StreamRecord, parse_ffprobe_output};

const TWO_AUDIO_STREAMS: &str = r#"{
    "programs": [],
    "streams": [
        { "index": 1, "tags": { "title": "English 5.1" } },
        { "index": 2, "tags": { "title": "Deutsch DTS", "language": "ger" } }
    ]
}"#;

#[test]
fn test_parse_ffprobe_output_withTitledStreams_shouldReturnRecordsInOrder() -> Result<()> {
    let streams = parse_ffprobe_output(Path::new("Movie.mkv"), TWO_AUDIO_STREAMS)?;

    assert_eq!(
        streams,
        vec![
            StreamRecord::new(1, Some("English 5.1")),
            StreamRecord::new(2, Some("Deutsch DTS")),
        ]
    );
    Ok(())
}

#[test]
fn test_parse_ffprobe_output_withUntitledStream_shouldHaveNoTitle() -> Result<()> {
    let json = r#"{ "streams": [ { "index": 1 }, { "index": 2, "tags": { "language": "eng" } } ] }"#;
    let streams = parse_ffprobe_output(Path::new("Movie.mkv"), json)?;

    assert_eq!(streams.len(), 2);
    assert!(streams.iter().all(|s| s.title.is_none()));
    assert_eq!(streams[0].title_text(), "");
    Ok(())
}

/// Matroska files often report the tag in upper case
#[test]
fn test_parse_ffprobe_output_withUppercaseTitleKey_shouldFindTitle() -> Result<()> {
    let json = r#"{ "streams": [ { "index": 3, "tags": { "TITLE": "German Commentary" } } ] }"#;
    let streams = parse_ffprobe_output(Path::new("Movie.mkv"), json)?;

    assert_eq!(streams, vec![StreamRecord::new(3, Some("German Commentary"))]);
    Ok(())
}

#[test]
fn test_parse_ffprobe_output_withMissingIndex_shouldUsePosition() -> Result<()> {
    let json = r#"{ "streams": [ { "tags": { "title": "A" } }, { "tags": { "title": "B" } } ] }"#;
    let streams = parse_ffprobe_output(Path::new("Movie.mkv"), json)?;

    assert_eq!(streams[0].index, 0);
    assert_eq!(streams[1].index, 1);
    Ok(())
}

#[test]
fn test_parse_ffprobe_output_withNoAudio_shouldReturnEmpty() -> Result<()> {
    assert!(parse_ffprobe_output(Path::new("Movie.mkv"), "")?.is_empty());
    assert!(parse_ffprobe_output(Path::new("Movie.mkv"), "{}")?.is_empty());
    assert!(parse_ffprobe_output(Path::new("Movie.mkv"), r#"{ "streams": [] }"#)?.is_empty());
    Ok(())
}

#[test]
fn test_parse_ffprobe_output_withGarbage_shouldReturnMalformedOutput() {
    let result = parse_ffprobe_output(Path::new("Movie.mkv"), "Invalid data found when processing input");

    match result {
        Err(ProbeError::MalformedOutput { path, .. }) => assert_eq!(path, Path::new("Movie.mkv")),
        other => panic!("Expected MalformedOutput, got {:?}", other),
    }
}
