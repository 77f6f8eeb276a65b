//! Alignment file reading.
//!
//! Supports two formats, selected by file extension (case-insensitive):
//! - PHYLIP (.phy, .phylip, .ph) - sequential and interleaved
//! - FASTA (.fas, .fasta, .fa, .fna, .faa, .ffn, .frn)
//!
//! Reading goes through three stages: the format parser turns text into
//! records, the validator checks them as a whole, and only then is the
//! alignment matrix allocated. Any failure aborts the read.

pub mod fasta;
pub mod phylip;

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, error};
use thiserror::Error;

use crate::grammar::GrammarError;
use crate::model::{Alignment, ParseResult};

/// Supported alignment file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Phylip,
    Fasta,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Phylip => write!(f, "PHYLIP"),
            FileFormat::Fasta => write!(f, "FASTA"),
        }
    }
}

impl FileFormat {
    /// Maps a file extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "phy" | "phylip" | "ph" => Some(FileFormat::Phylip),
            "fas" | "fasta" | "fa" | "fna" | "faa" | "ffn" | "frn" => Some(FileFormat::Fasta),
            _ => None,
        }
    }

    /// Detects the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .and_then(Self::from_extension)
    }
}

/// Header field that disagreed with the parsed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    SpeciesCount,
    SequenceLength,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::SpeciesCount => write!(f, "species count"),
            HeaderField::SequenceLength => write!(f, "sequence length"),
        }
    }
}

/// Errors that can occur while reading an alignment.
#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("Cannot find sequence file '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unknown file type: '{}'", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error in alignment parsing: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Repeated species name '{0}' in alignment")]
    DuplicateSpeciesName(String),

    #[error("Not all species have the same sequence length: '{name}' has {found}, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("The {field} in the header ({declared}) does not match the file ({found})")]
    HeaderMismatch {
        field: HeaderField,
        declared: usize,
        found: usize,
    },
}

/// Result type for alignment reading.
pub type AlignmentResult<T> = Result<T, AlignmentError>;

/// Runs the parser for `format` over in-memory text.
pub fn parse_records(content: &str, format: FileFormat) -> AlignmentResult<ParseResult> {
    let parsed = match format {
        FileFormat::Phylip => phylip::parse_phylip_str(content)?,
        FileFormat::Fasta => fasta::parse_fasta_str(content)?,
    };
    Ok(parsed)
}

/// Parses and validates in-memory text as an alignment.
pub fn parse_str(content: &str, format: FileFormat) -> AlignmentResult<Alignment> {
    Alignment::from_parse_result(parse_records(content, format)?)
}

/// Reads an alignment file, selecting the parser from the file extension.
///
/// Failures are logged with their cause before being returned.
///
/// # Examples
///
/// ```no_run
/// let alignment = tigger::read("primates.phy").unwrap();
/// println!("{} species, {} sites", alignment.species_count(), alignment.sequence_length());
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> AlignmentResult<Alignment> {
    let path = path.as_ref();
    let result = read_alignment(path);
    if let Err(err) = &result {
        log_failure(err);
    }
    result
}

fn read_alignment(path: &Path) -> AlignmentResult<Alignment> {
    if !path.is_file() {
        return Err(AlignmentError::FileNotFound(path.to_path_buf()));
    }
    let format =
        FileFormat::from_path(path).ok_or_else(|| AlignmentError::UnknownFormat(path.to_path_buf()))?;

    debug!("Reading {} alignment file '{}'", format, path.display());
    let content = read_to_string(path).map_err(|source| AlignmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let alignment = parse_str(&content, format)?;
    debug!("Parsed {}", alignment);
    Ok(alignment)
}

/// Reads the whole file; the handle is closed on return.
fn read_to_string(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;
    Ok(content)
}

fn log_failure(err: &AlignmentError) {
    error!("{}", err);

    if let AlignmentError::Grammar(grammar) = err {
        if !grammar.context.is_empty() {
            // tabs would throw the caret off
            error!("  {}", grammar.context.replace('\t', " "));
            error!("  {}^", " ".repeat(grammar.column - 1));
        }
        error!(
            "A common cause of this error is having whitespace, i.e. spaces or tabs, in the \
             species names. Please check this and remove all whitespace from species names, \
             or replace them with e.g. underscores"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(FileFormat::from_path("test.phy"), Some(FileFormat::Phylip));
        assert_eq!(FileFormat::from_path("test.phylip"), Some(FileFormat::Phylip));
        assert_eq!(FileFormat::from_path("test.PHY"), Some(FileFormat::Phylip));
        assert_eq!(FileFormat::from_path("test.fas"), Some(FileFormat::Fasta));
        assert_eq!(FileFormat::from_path("test.Fasta"), Some(FileFormat::Fasta));
        assert_eq!(FileFormat::from_path("test.fa"), Some(FileFormat::Fasta));
        assert_eq!(FileFormat::from_path("dir.phy/test.txt"), None);
        assert_eq!(FileFormat::from_path("test.nex"), None);
        assert_eq!(FileFormat::from_path("phy"), None);
    }

    #[test]
    fn test_same_alignment_from_both_formats() {
        let phylip = parse_str("2 4\ndog  ACGT\ncat  ACGA\n", FileFormat::Phylip).unwrap();
        let fasta = parse_str(">dog\nacgt\n>cat\nacga\n", FileFormat::Fasta).unwrap();
        assert_eq!(phylip, fasta);
        assert_eq!(phylip.species(), ["dog", "cat"]);
    }

    #[test]
    fn test_parse_records_keeps_header() {
        let parsed = parse_records("2 4\ndog  ACGT\ncat  ACGA\n", FileFormat::Phylip).unwrap();
        assert_eq!(parsed.declared_species_count, Some(2));

        let parsed = parse_records(">dog\nACGT\n", FileFormat::Fasta).unwrap();
        assert_eq!(parsed.declared_species_count, None);
    }

    #[test]
    fn test_grammar_error_wrapped() {
        let err = parse_str("2 4\nHomo sapiens ACGT\n", FileFormat::Phylip).unwrap_err();
        assert!(matches!(err, AlignmentError::Grammar(ref g) if g.line == 2));
        assert!(err.to_string().starts_with("Error in alignment parsing: line 2"));
    }

    #[test]
    fn test_header_mismatch_message() {
        let err = parse_str("3 4\ndog  ACGT\ncat  ACGA\n", FileFormat::Phylip).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The species count in the header (3) does not match the file (2)"
        );
    }

    #[test]
    fn test_huge_declared_species_count() {
        for header in ["100000000000000 4", "18446744073709551615 4"] {
            let content = format!("{}\ndog  ACGT\ncat  ACGA\n", header);
            let err = parse_str(&content, FileFormat::Phylip).unwrap_err();
            assert!(matches!(
                err,
                AlignmentError::HeaderMismatch {
                    field: HeaderField::SpeciesCount,
                    found: 2,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_classic_mac_line_endings() {
        let phylip = parse_str("2 4\rdog ACGT\rcat ACGA\r", FileFormat::Phylip).unwrap();
        let fasta = parse_str(">dog\rACGT\r\r>cat\rACGA\r", FileFormat::Fasta).unwrap();
        assert_eq!(phylip.shape(), (2, 4));
        assert_eq!(phylip, fasta);
    }
}
