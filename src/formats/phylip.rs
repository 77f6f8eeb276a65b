//! PHYLIP format parser.
//!
//! Supports both sequential and interleaved PHYLIP layouts.
//!
//! ## PHYLIP Format
//!
//! The first non-blank line holds the species count and the sequence length;
//! anything after those two integers is ignored:
//! ```text
//!  3 10
//! ```
//!
//! ### Sequential Format
//! One line per species, a name then its bases:
//! ```text
//!  3 10
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//! Seq3      AAAACCCCGG
//! ```
//!
//! ### Interleaved Format
//! Names on the first block, then blank-line separated blocks that add one
//! more chunk to every species, in the order of the first block:
//! ```text
//!  3 20
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//! Seq3      AAAACCCCGG
//!
//! GTGTGTGTGT
//! CACACACACA
//! TTTTTTTTTT
//! ```
//!
//! Names are whitespace-delimited ("relaxed" PHYLIP), so a name may be up to
//! 100 characters but can never contain a space. Each line carries a single
//! unbroken run of bases.

use crate::grammar::{
    is_blank, scan_bases, scan_integer, scan_name, skip_blank_lines, skip_separators,
    split_lines, GrammarError, NameClass,
};
use crate::model::{ParseResult, SequenceRecord};

/// Parses PHYLIP content into records plus the declared header counts.
///
/// Header counts are not checked here; see [`crate::validate::validate`].
pub fn parse_phylip_str(content: &str) -> Result<ParseResult, GrammarError> {
    let lines = split_lines(content);

    let header_idx = skip_blank_lines(&lines, 0);
    let header = lines.get(header_idx).ok_or_else(|| {
        GrammarError::end_of_input(lines.len(), "expected a header with species count and sequence length")
    })?;
    let (species_count, offset) = scan_integer(header, header_idx + 1, 0)?;
    let (sequence_length, _) = scan_integer(header, header_idx + 1, offset)?;

    let mut parsed = ParseResult::with_header(species_count, sequence_length);

    let mut idx = skip_blank_lines(&lines, header_idx + 1);
    if idx >= lines.len() {
        return Err(GrammarError::end_of_input(
            lines.len(),
            "expected a species name and sequence after the header",
        ));
    }

    while let Some(line) = lines.get(idx).filter(|line| !is_blank(line)) {
        parsed.records.push(parse_seq_start(line, idx + 1)?);
        idx += 1;
    }

    loop {
        idx = skip_blank_lines(&lines, idx);
        if idx >= lines.len() {
            break;
        }
        idx = parse_continuation_block(&lines, idx, &mut parsed.records)?;
    }

    Ok(parsed)
}

/// Parses a `name bases` line from the first block.
fn parse_seq_start(line: &str, line_no: usize) -> Result<SequenceRecord, GrammarError> {
    let start = skip_separators(line, 0);
    let (name, end) = scan_name(line, line_no, start, NameClass::Phylip)?;
    let bases = scan_bases(line, line_no, end)?;
    Ok(SequenceRecord::new(name, bases))
}

/// Parses one continuation block starting at `start`, returning the index of
/// the first line after it.
///
/// Line `k` of the block extends record `k`; the block must hold exactly one
/// line per record.
fn parse_continuation_block(
    lines: &[&str],
    start: usize,
    records: &mut [SequenceRecord],
) -> Result<usize, GrammarError> {
    let mut idx = start;
    let mut cursor = 0;

    while let Some(line) = lines.get(idx).filter(|line| !is_blank(line)) {
        append_continuation(records, cursor, line, idx + 1)?;
        cursor += 1;
        idx += 1;
    }

    if cursor < records.len() {
        let last = lines[idx - 1];
        return Err(GrammarError::at(
            idx,
            last,
            last.len(),
            format!(
                "interleaved block ends after {} lines, expected one line for each of the {} species",
                cursor,
                records.len()
            ),
        ));
    }

    Ok(idx)
}

/// Appends a bases-only line to the record at `cursor`.
fn append_continuation(
    records: &mut [SequenceRecord],
    cursor: usize,
    line: &str,
    line_no: usize,
) -> Result<(), GrammarError> {
    let species_count = records.len();
    let record = records.get_mut(cursor).ok_or_else(|| {
        GrammarError::at(
            line_no,
            line,
            skip_separators(line, 0),
            format!(
                "interleaved block has more lines than the {} species of the first block",
                species_count
            ),
        )
    })?;
    record.bases.push_str(&scan_bases(line, line_no, 0)?);
    Ok(())
}
