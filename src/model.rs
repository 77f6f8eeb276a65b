//! Data model for parsed and validated alignments.
//!
//! This module contains the data structures for representing:
//! - Records as they come out of a parser (`SequenceRecord`, `ParseResult`)
//! - The validated site matrix handed to rate estimation (`Alignment`)

use std::fmt;

use crate::formats::AlignmentResult;
use crate::validate::validate;

/// A single named sequence as read from an alignment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The species name
    pub name: String,
    /// Uppercased base symbols
    pub bases: String,
}

impl SequenceRecord {
    /// Creates a new record.
    pub fn new(name: impl Into<String>, bases: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: bases.into(),
        }
    }

    /// Returns the number of bases.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns true if the record has no bases.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Output of a format parser, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Species count from the file header, if the format has one
    pub declared_species_count: Option<usize>,
    /// Sequence length from the file header, if the format has one
    pub declared_sequence_length: Option<usize>,
    /// Records in file order
    pub records: Vec<SequenceRecord>,
}

impl ParseResult {
    /// Creates an empty result carrying header counts.
    pub fn with_header(species_count: usize, sequence_length: usize) -> Self {
        Self {
            declared_species_count: Some(species_count),
            declared_sequence_length: Some(sequence_length),
            records: Vec::new(),
        }
    }

    /// Creates a result for a format without a header.
    pub fn headerless(records: Vec<SequenceRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

/// A validated alignment: one row per species, one column per site.
///
/// Rows are stored contiguously in a single row-major byte buffer. Species
/// names are unique and every row has exactly `sequence_length` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    species: Vec<String>,
    sequence_length: usize,
    data: Vec<u8>,
}

impl Alignment {
    /// Validates parsed records and builds the site matrix from them.
    pub fn from_parse_result(parsed: ParseResult) -> AlignmentResult<Self> {
        let sequence_length = validate(&parsed)?;
        Ok(Self::build(parsed.records, sequence_length))
    }

    /// Copies validated records into the matrix, keeping file order.
    fn build(records: Vec<SequenceRecord>, sequence_length: usize) -> Self {
        let mut species = Vec::with_capacity(records.len());
        let mut data = Vec::with_capacity(records.len() * sequence_length);

        for record in records {
            debug_assert_eq!(record.len(), sequence_length);
            data.extend_from_slice(record.bases.as_bytes());
            species.push(record.name);
        }

        Self {
            species,
            sequence_length,
            data,
        }
    }

    /// Returns the number of species (rows).
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Returns the number of sites (columns).
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Returns `(species_count, sequence_length)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.species_count(), self.sequence_length)
    }

    /// Species names, in row order.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// The whole matrix as row-major bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Gets the bases of one species.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.species_count() {
            return None;
        }
        let start = row * self.sequence_length;
        Some(&self.data[start..start + self.sequence_length])
    }

    /// Gets the base at a specific row and column.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if col >= self.sequence_length {
            return None;
        }
        self.row(row).map(|bases| bases[col])
    }

    /// Iterates over one site, top to bottom.
    pub fn column(&self, col: usize) -> Option<impl Iterator<Item = u8> + '_> {
        if col >= self.sequence_length {
            return None;
        }
        Some(self.data.iter().skip(col).step_by(self.sequence_length).copied())
    }

    /// Returns true if the alignment has no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alignment({} species, {} sites)",
            self.species_count(),
            self.sequence_length
        )
    }
}
