//! FASTA format parser.
//!
//! Alignments in FASTA are read as strict `>name` / sequence pairs: every
//! record is a header line followed by exactly one line of bases.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier
//! ACGTACGTACGT
//! >another_sequence
//! TGCATGCATGCA
//! ```
//!
//! Blank lines between records are ignored. Header descriptions are not
//! supported: a species name ends the header line.

use crate::grammar::{
    scan_bases, scan_name, skip_blank_lines, skip_separators, split_lines, GrammarError,
    NameClass,
};
use crate::model::{ParseResult, SequenceRecord};

/// Parses FASTA content into records. FASTA carries no header counts.
pub fn parse_fasta_str(content: &str) -> Result<ParseResult, GrammarError> {
    let lines = split_lines(content);
    let mut records = Vec::new();

    let mut idx = skip_blank_lines(&lines, 0);
    if idx >= lines.len() {
        return Err(GrammarError::end_of_input(
            lines.len(),
            "expected '>' followed by a species name",
        ));
    }

    while idx < lines.len() {
        let name = parse_name_line(lines[idx], idx + 1)?;

        let seq_idx = skip_blank_lines(&lines, idx + 1);
        let line = lines.get(seq_idx).ok_or_else(|| {
            GrammarError::end_of_input(lines.len(), format!("expected sequence data for '{}'", name))
        })?;
        if line.trim_start().starts_with('>') {
            return Err(GrammarError::at(
                seq_idx + 1,
                line,
                skip_separators(line, 0),
                format!("expected sequence data for '{}', found a new record", name),
            ));
        }

        records.push(SequenceRecord::new(name, scan_bases(line, seq_idx + 1, 0)?));
        idx = skip_blank_lines(&lines, seq_idx + 1);
    }

    Ok(ParseResult::headerless(records))
}

/// Parses a `>name` line and returns the name.
fn parse_name_line(line: &str, line_no: usize) -> Result<&str, GrammarError> {
    let marker = skip_separators(line, 0);
    if !line[marker..].starts_with('>') {
        return Err(GrammarError::at(
            line_no,
            line,
            marker,
            "expected '>' at the start of a record",
        ));
    }

    let start = skip_separators(line, marker + 1);
    let (name, end) = scan_name(line, line_no, start, NameClass::Fasta)?;

    let rest = skip_separators(line, end);
    if rest < line.len() {
        return Err(GrammarError::at(
            line_no,
            line,
            rest,
            "unexpected text after species name",
        ));
    }

    Ok(name)
}
