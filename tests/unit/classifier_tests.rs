/*!
 * Tests for language classification
 */

use langtagger::app_config::Config;
use langtagger::classifier::{Evidence, LanguageClassifier};
use langtagger::probe::StreamRecord;
use langtagger::LanguageProfile;

fn german() -> LanguageProfile {
    Config::default().languages["de"].clone()
}

/// A German track title is enough to match
#[test]
fn test_classify_withGermanTrackTitle_shouldMatch() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);
    let streams = vec![
        StreamRecord::new(1, Some("English 5.1")),
        StreamRecord::new(2, Some("Deutsch DTS")),
    ];

    let result = classifier.classify(&streams, "Movie.mkv", "Movie (2020)");

    assert!(result.is_match());
    assert_eq!(
        result.evidence,
        vec![Evidence::StreamTitle { index: 2, title: "Deutsch DTS".to_string() }]
    );
}

/// Without stream metadata the file name still decides
#[test]
fn test_classify_withoutStreams_shouldMatchFileName() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);

    let result = classifier.classify(&[], "Movie.DE.mkv", "Foo");

    assert!(result.is_match());
    assert_eq!(result.evidence, vec![Evidence::FileName("Movie.DE.mkv".to_string())]);
}

/// Without stream metadata the folder name still decides
#[test]
fn test_classify_withoutStreams_shouldMatchFolderName() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);

    let result = classifier.classify(&[], "Movie.mkv", "Filme Deutsch");

    assert!(result.is_match());
    assert_eq!(result.evidence, vec![Evidence::FolderName("Filme Deutsch".to_string())]);
}

/// Every source is checked and reported
#[test]
fn test_classify_withSeveralSources_shouldCollectAllEvidence() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);
    let streams = vec![
        StreamRecord::new(1, Some("German")),
        StreamRecord::new(2, Some("Deutsch Kommentar")),
    ];

    let result = classifier.classify(&streams, "Film.German.mkv", "De Filme");

    assert_eq!(result.evidence.len(), 4);
    assert!(matches!(result.evidence[0], Evidence::StreamTitle { index: 1, .. }));
    assert!(matches!(result.evidence[1], Evidence::StreamTitle { index: 2, .. }));
    assert!(matches!(result.evidence[2], Evidence::FileName(_)));
    assert!(matches!(result.evidence[3], Evidence::FolderName(_)));
}

/// Matching is case-sensitive
#[test]
fn test_classify_withLowercaseText_shouldNotMatch() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);
    let streams = vec![StreamRecord::new(1, Some("german"))];

    let result = classifier.classify(&streams, "deadpool.mkv", "deutsch");

    assert!(!result.is_match());
    assert!(result.evidence.is_empty());
}

/// "De " needs the trailing space, "DE" matches anywhere
#[test]
fn test_contains_pattern_withShortPatterns_shouldUsePlainSubstrings() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);

    assert!(!classifier.contains_pattern("Der Film.mkv"));
    assert!(classifier.contains_pattern("De Film.mkv"));
    assert!(classifier.contains_pattern("Movie.DE.mkv"));
    assert!(classifier.contains_pattern("DEADPOOL.mkv"));
    assert!(!classifier.contains_pattern(""));
}

/// Streams without a title never match and never fail
#[test]
fn test_classify_withUntitledStreams_shouldNotMatch() {
    let profile = german();
    let classifier = LanguageClassifier::new(&profile);
    let streams = vec![StreamRecord::new(0, None), StreamRecord::new(1, None)];

    let result = classifier.classify(&streams, "Movie.mkv", "Foo");

    assert!(!result.is_match());
}

/// Evidence renders as diagnostic text
#[test]
fn test_evidence_display_shouldDescribeSource() {
    let title = Evidence::StreamTitle { index: 3, title: "Deutsch".to_string() };
    assert_eq!(title.to_string(), "audio track title: 'Deutsch'");
    assert_eq!(Evidence::FileName("a.mkv".to_string()).to_string(), "file name: 'a.mkv'");
    assert_eq!(Evidence::FolderName("Foo".to_string()).to_string(), "folder name: 'Foo'");
}
