use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use tempfile::TempDir;

use tigger::formats::HeaderField;
use tigger::{read, AlignmentError};

/// Writes `content` to `name` inside a fresh temporary directory.
fn write_temp(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn phylip_dog_cat() {
    let alignment = read("test_data/dog_cat.phy").unwrap();
    assert_eq!(alignment.species(), ["dog", "cat"]);
    assert_eq!(alignment.species_count(), 2);
    assert_eq!(alignment.sequence_length(), 4);
    assert_eq!(alignment.row(0), Some(&b"ACGT"[..]));
    assert_eq!(alignment.row(1), Some(&b"ACGA"[..]));
}

#[test]
fn fasta_matches_phylip() {
    let phylip = read("test_data/dog_cat.phy").unwrap();
    let fasta = read("test_data/dog_cat.fas").unwrap();
    assert_eq!(fasta, phylip);
}

#[test]
fn interleaved_phylip() {
    let alignment = read("test_data/primates_interleaved.phy").unwrap();
    assert_eq!(alignment.shape(), (5, 30));
    assert_eq!(
        alignment.species(),
        ["Human", "Chimp", "Gorilla", "Orangutan", "Gibbon"]
    );
    assert_eq!(
        alignment.row(3),
        Some(&b"AAGCTTCACCGGCGCAACCATCGACCCAAC"[..])
    );
    assert_eq!(
        alignment.row(4),
        Some(&b"AAGCTTTACCGGCGCAGCAATCGACCCAAT"[..])
    );
}

#[test]
fn header_species_count_mismatch() {
    let err = read("test_data/missing_species.phy").unwrap_err();
    assert!(matches!(
        err,
        AlignmentError::HeaderMismatch {
            field: HeaderField::SpeciesCount,
            declared: 3,
            found: 2,
        }
    ));
}

#[test]
fn header_length_mismatch() {
    let (_dir, path) = write_temp("short.phy", b"2 5\ndog ACGT\ncat ACGA\n");
    assert!(matches!(
        read(&path),
        Err(AlignmentError::HeaderMismatch {
            field: HeaderField::SequenceLength,
            ..
        })
    ));
}

#[test]
fn duplicate_species_rejected() {
    let content = indoc! {"
        >dog
        ACGT
        >cat
        ACGA
        >dog
        ACGG
    "};
    let (_dir, path) = write_temp("dup.fas", content.as_bytes());
    match read(&path) {
        Err(AlignmentError::DuplicateSpeciesName(name)) => assert_eq!(name, "dog"),
        other => panic!("expected a duplicate name error, got {:?}", other),
    }
}

#[test]
fn differing_lengths_rejected() {
    let (_dir, path) = write_temp("ragged.fasta", b">dog\nACGT\n>cat\nACG\n");
    assert!(matches!(
        read(&path),
        Err(AlignmentError::LengthMismatch { expected: 4, found: 3, .. })
    ));
}

#[test]
fn case_normalized_round_trip() {
    let content = indoc! {"
        3 8
        a  acgT-?.n
        b  ACGTACGT
        c  nnnn----
    "};
    let (_dir, path) = write_temp("mixed.PHY", content.as_bytes());
    let alignment = read(&path).unwrap();
    assert_eq!(alignment.row(0), Some(&b"ACGT-?.N"[..]));
    assert_eq!(alignment.row(2), Some(&b"NNNN----"[..]));
    assert_eq!(alignment.data().len(), 24);
}

#[test]
fn windows_line_endings() {
    let (_dir, path) = write_temp("crlf.phy", b"2 4\r\ndog ACGT\r\ncat ACGA\r\n\r\n");
    let alignment = read(&path).unwrap();
    assert_eq!(alignment.shape(), (2, 4));
}

#[test]
fn classic_mac_line_endings() {
    let (_dir, path) = write_temp("mac.phy", b"2 4\rdog ACGT\rcat ACGA\r");
    let alignment = read(&path).unwrap();
    assert_eq!(alignment.shape(), (2, 4));
    assert_eq!(alignment.row(1), Some(&b"ACGA"[..]));
}

#[test]
fn huge_species_count_in_header() {
    let (_dir, path) = write_temp("huge.phy", b"100000000000000 4\ndog ACGT\ncat ACGA\n");
    assert!(matches!(
        read(&path),
        Err(AlignmentError::HeaderMismatch {
            field: HeaderField::SpeciesCount,
            found: 2,
            ..
        })
    ));
}

#[test]
fn grammar_failure_reports_position() {
    let (_dir, path) = write_temp("spaces.phy", b"2 4\nHomo sapiens ACGT\nPan ACGT\n");
    match read(&path) {
        Err(AlignmentError::Grammar(err)) => {
            assert_eq!(err.line, 2);
            assert_eq!(err.column, 14);
        }
        other => panic!("expected a grammar error, got {:?}", other),
    }
}

#[test]
fn missing_file() {
    assert!(matches!(
        read("test_data/does_not_exist.phy"),
        Err(AlignmentError::FileNotFound(_))
    ));
    // existence is checked before the extension
    assert!(matches!(
        read("test_data/does_not_exist.txt"),
        Err(AlignmentError::FileNotFound(_))
    ));
}

#[test]
fn unknown_extension_rejected_before_reading() {
    // not valid UTF-8: reading it would fail with an I/O error instead
    let (_dir, path) = write_temp("alignment.txt", &[0xff, 0xfe, 0x00]);
    assert!(matches!(read(&path), Err(AlignmentError::UnknownFormat(_))));
}

#[test]
fn unreadable_content() {
    let (_dir, path) = write_temp("binary.fas", &[b'>', 0xff, 0xfe]);
    assert!(matches!(read(&path), Err(AlignmentError::Io { .. })));
}

#[test]
fn directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folder.phy");
    fs::create_dir(&path).unwrap();
    assert!(matches!(read(&path), Err(AlignmentError::FileNotFound(_))));
}
