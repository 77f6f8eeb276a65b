//! Structural checks run once a parser has produced all records.

use std::collections::HashSet;

use crate::formats::{AlignmentError, AlignmentResult, HeaderField};
use crate::model::ParseResult;

/// Checks alignment-wide invariants and returns the sequence length.
///
/// Records are checked in file order: the first repeated name or the first
/// record whose length differs from the first record's is reported. Header
/// counts, when present, must then agree with what was parsed.
pub fn validate(parsed: &ParseResult) -> AlignmentResult<usize> {
    let mut names: HashSet<&str> = HashSet::with_capacity(parsed.records.len());
    let mut reference: Option<usize> = None;

    for record in &parsed.records {
        if !names.insert(record.name.as_str()) {
            return Err(AlignmentError::DuplicateSpeciesName(record.name.clone()));
        }

        match reference {
            None => reference = Some(record.len()),
            Some(expected) if record.len() != expected => {
                return Err(AlignmentError::LengthMismatch {
                    name: record.name.clone(),
                    expected,
                    found: record.len(),
                });
            }
            Some(_) => {}
        }
    }

    let sequence_length = reference.unwrap_or(0);

    if let Some(declared) = parsed.declared_sequence_length {
        if declared != sequence_length {
            return Err(AlignmentError::HeaderMismatch {
                field: HeaderField::SequenceLength,
                declared,
                found: sequence_length,
            });
        }
    }

    if let Some(declared) = parsed.declared_species_count {
        if declared != parsed.records.len() {
            return Err(AlignmentError::HeaderMismatch {
                field: HeaderField::SpeciesCount,
                declared,
                found: parsed.records.len(),
            });
        }
    }

    Ok(sequence_length)
}
