//! Whole-text FASTA parsing
//!
//! Lines are trimmed and the text is cut at every line that starts with `>`. Each
//! non-empty chunk is a header line followed by sequence lines, including a chunk
//! of text ahead of the first `>`. Compared to the strict state
//! machine this form strips `:` from record ids, can normalize case, reads
//! bracket-tag attributes from headers, and refuses input with no record marker.

use crate::{
    error::{FormatError, Result},
    record::AttributeMatcher,
    FastaCollection, FastaRecord,
};

/// Case normalization applied to sequence payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Case {
    #[default]
    Preserve,
    Upper,
    Lower,
}
impl Case {
    fn apply(self, sequence: &mut String) {
        match self {
            Self::Preserve => {}
            Self::Upper => sequence.make_ascii_uppercase(),
            Self::Lower => sequence.make_ascii_lowercase(),
        }
    }
}

/// Options for [`parse_split`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Key records by their full header instead of their id
    pub key_by_header: bool,

    /// Case normalization of the sequence payload
    pub case: Case,
}
impl SplitOptions {
    #[must_use]
    pub fn key_by_header(mut self, key_by_header: bool) -> Self {
        self.key_by_header = key_by_header;
        self
    }

    #[must_use]
    pub fn case(mut self, case: Case) -> Self {
        self.case = case;
        self
    }
}

/// Parses FASTA text by splitting it into per-record chunks
///
/// Every record carries [`FastaAttributes`](crate::FastaAttributes) read from its
/// header; tags that are absent stay unset.
///
/// # Errors
///
/// * [`FormatError::NotFasta`] if no line starts with `>` (including empty input)
/// * [`FormatError::MissingIdentifier`] if a header has no id token
pub fn parse_split(text: &str, options: &SplitOptions) -> Result<FastaCollection> {
    let matcher = AttributeMatcher::new()?;
    let mut records = FastaCollection::new();

    let mut current: Option<(usize, &str)> = None;
    let mut sequence = String::new();
    let mut seen_header = false;

    for (index, line) in text.split('\n').map(str::trim).enumerate() {
        if let Some(header) = line.strip_prefix('>') {
            if let Some((head_idx, head)) = current.take() {
                let record = build(head, head_idx, &mut sequence, &matcher, options)?;
                insert(&mut records, record, options);
            }
            current = Some((index, header.trim()));
            seen_header = true;
        } else if current.is_some() {
            sequence.extend(line.chars().filter(|c| !c.is_whitespace()));
        } else if !line.is_empty() {
            // text ahead of the first marker forms its own chunk
            log::warn!("line {index} precedes the first '>' and opens a record");
            current = Some((index, line));
        }
    }
    if let Some((head_idx, head)) = current.take() {
        let record = build(head, head_idx, &mut sequence, &matcher, options)?;
        insert(&mut records, record, options);
    }

    if !seen_header {
        return Err(FormatError::NotFasta.into());
    }
    Ok(records)
}

fn build(
    header: &str,
    index: usize,
    sequence: &mut String,
    matcher: &AttributeMatcher,
    options: &SplitOptions,
) -> Result<FastaRecord> {
    let id: String = header
        .split(char::is_whitespace)
        .next()
        .unwrap_or("")
        .chars()
        .filter(|&c| c != ':')
        .collect();
    if id.is_empty() {
        return Err(FormatError::MissingIdentifier {
            line: format!(">{header}"),
            index,
        }
        .into());
    }

    let mut payload = std::mem::take(sequence);
    options.case.apply(&mut payload);

    Ok(FastaRecord::new(id, header.to_string(), payload).with_attributes(matcher.extract(header)))
}

fn insert(records: &mut FastaCollection, record: FastaRecord, options: &SplitOptions) {
    let key = if options.key_by_header {
        record.header.clone()
    } else {
        record.id.clone()
    };
    records.insert(key, record);
}
