//! Line-oriented FASTA state machine
//!
//! The parser walks an indexable list of lines followed by an explicit end-of-input
//! sentinel. It moves between three states:
//!
//! * `OutRead` - between records; a `>` line opens a record, blank lines are skipped,
//!   anything else is a fatal [`FormatError::UnexpectedCharacter`].
//! * `InSeq` - collecting sequence fragments until the next `>` line or the sentinel,
//!   which is left unconsumed.
//! * `SeqEnd` - finalizes the pending record and returns to `OutRead` without
//!   consuming a line, so the next header is re-examined there.

use indexmap::IndexMap;
use memchr::memchr_iter;

use crate::{
    error::{FormatError, Result},
    FastaRecord,
};

/// Parsed records keyed by sequence id, in first-seen order
pub type FastaCollection = IndexMap<String, FastaRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    OutRead,
    InSeq,
    SeqEnd,
}

/// Classification of the line under the cursor
#[derive(Debug, Clone, Copy)]
enum Line<'a> {
    Header(&'a str),
    Blank,
    Payload(&'a str),
    End,
}
impl<'a> Line<'a> {
    fn at(lines: &[&'a str], idx: usize) -> Self {
        let Some(&raw) = lines.get(idx) else {
            return Self::End;
        };
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.starts_with('>') {
            Self::Header(line)
        } else if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Payload(line)
        }
    }
}

/// Splits text on `\n` without allocating per line
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for pos in memchr_iter(b'\n', text.as_bytes()) {
        lines.push(&text[start..pos]);
        start = pos + 1;
    }
    lines.push(&text[start..]);
    lines
}

/// Parses FASTA text with the strict state machine
///
/// Records are keyed by the first whitespace-delimited token of their header.
/// Empty input yields an empty collection. Duplicate ids keep the last record.
///
/// # Errors
///
/// * [`FormatError::UnexpectedCharacter`] if a non-blank line appears outside a record
/// * [`FormatError::MissingIdentifier`] if a header has no leading id token
pub fn parse_strict(text: &str) -> Result<FastaCollection> {
    run(text, None)
}

/// Parses FASTA text, deriving each record id with `transform`
///
/// `transform` receives the primary header token and the full header (without the
/// leading `>`); its return value becomes the record id.
pub fn parse_strict_with<F>(text: &str, transform: F) -> Result<FastaCollection>
where
    F: Fn(&str, &str) -> String,
{
    let transform: &dyn Fn(&str, &str) -> String = &transform;
    run(text, Some(transform))
}

fn run(text: &str, transform: Option<&dyn Fn(&str, &str) -> String>) -> Result<FastaCollection> {
    let lines = split_lines(text);
    let mut records = FastaCollection::new();

    let mut state = State::OutRead;
    let mut head: Option<(usize, &str)> = None;
    let mut fragments: Vec<&str> = Vec::new();

    let mut idx = 0;
    while idx <= lines.len() {
        match state {
            State::OutRead => match Line::at(&lines, idx) {
                Line::Header(line) => {
                    head = Some((idx, line));
                    state = State::InSeq;
                    idx += 1;
                }
                Line::Blank | Line::End => idx += 1,
                Line::Payload(line) => {
                    return Err(FormatError::UnexpectedCharacter {
                        code: line.chars().next().map_or(0, u32::from),
                        line: line.to_string(),
                        index: idx,
                    }
                    .into());
                }
            },
            State::InSeq => match Line::at(&lines, idx) {
                Line::Header(_) | Line::End => state = State::SeqEnd,
                Line::Blank => idx += 1,
                Line::Payload(line) => {
                    fragments.push(line);
                    idx += 1;
                }
            },
            State::SeqEnd => {
                if let Some((head_idx, line)) = head.take() {
                    let record = finalize(line, head_idx, &fragments, transform)?;
                    records.insert(record.id.clone(), record);
                }
                fragments.clear();
                state = State::OutRead;
            }
        }
    }

    Ok(records)
}

fn finalize(
    line: &str,
    index: usize,
    fragments: &[&str],
    transform: Option<&dyn Fn(&str, &str) -> String>,
) -> Result<FastaRecord> {
    let header = &line[1..];
    let primary = header.split(char::is_whitespace).next().unwrap_or("");
    if primary.is_empty() {
        return Err(FormatError::MissingIdentifier {
            line: line.to_string(),
            index,
        }
        .into());
    }

    let id = match transform {
        Some(transform) => transform(primary, header),
        None => primary.to_string(),
    };
    let sequence = fragments
        .iter()
        .flat_map(|frag| frag.chars())
        .filter(|c| !c.is_whitespace())
        .collect();

    Ok(FastaRecord::new(id, header.to_string(), sequence))
}
