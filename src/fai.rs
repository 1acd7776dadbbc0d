//! Reader for samtools-style `.fai` FASTA index files
//!
//! Each line holds tab-separated columns: name, sequence length, byte offset of the
//! first base, and optionally bases per line and bytes per line.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::{FormatError, Result};
use crate::fasta::read_to_string;

/// One indexed sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaiEntry {
    pub name: String,
    /// Number of bases
    pub length: u64,
    /// Byte offset of the first base in the FASTA file
    pub offset: u64,
    pub line_bases: Option<u64>,
    pub line_width: Option<u64>,
}

/// Index entries keyed by sequence name, in file order
pub type FaiIndex = IndexMap<String, FaiEntry>;

/// Parses the text of a `.fai` index
///
/// Blank lines are skipped. A repeated name replaces the earlier entry in place.
///
/// # Errors
///
/// Returns [`FormatError::InvalidIndexLine`] if a line has fewer than three columns or
/// a numeric column is not an unsigned integer.
pub fn parse_fai(text: &str) -> Result<FaiIndex> {
    let mut index = FaiIndex::new();
    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let invalid = || FormatError::InvalidIndexLine {
            line: line.to_string(),
            index: line_idx,
        };

        let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
        if cols.len() < 3 || cols[0].is_empty() {
            return Err(invalid().into());
        }
        let number = |col: &str| col.parse::<u64>().map_err(|_| invalid());
        let optional = |idx: usize| cols.get(idx).map(|&col| number(col)).transpose();

        let entry = FaiEntry {
            name: cols[0].to_string(),
            length: number(cols[1])?,
            offset: number(cols[2])?,
            line_bases: optional(3)?,
            line_width: optional(4)?,
        };
        index.insert(entry.name.clone(), entry);
    }
    Ok(index)
}

/// Reads and parses a `.fai` file
pub fn read_fai<P: AsRef<Path>>(path: P) -> Result<FaiIndex> {
    parse_fai(&read_to_string(path)?)
}

/// Sum of all indexed sequence lengths
#[must_use]
pub fn indexed_length(index: &FaiIndex) -> u64 {
    index.values().map(|e| e.length).sum()
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::Error;
    use anyhow::Result;

    #[test]
    fn test_parse_fai() -> Result<()> {
        let index = parse_fai("chrI\t5000\t6\t60\t61\n\nchrII\t1200\t5097\t60\t61\nchrM\t40\t6320\n")?;
        assert_eq!(index.len(), 3);
        let names: Vec<_> = index.keys().map(String::as_str).collect();
        assert_eq!(names, ["chrI", "chrII", "chrM"]);

        let chr2 = &index["chrII"];
        assert_eq!((chr2.length, chr2.offset), (1200, 5097));
        assert_eq!((chr2.line_bases, chr2.line_width), (Some(60), Some(61)));
        assert_eq!(index["chrM"].line_bases, None);
        assert_eq!(indexed_length(&index), 6240);
        Ok(())
    }

    #[test]
    fn test_invalid_index_lines() {
        for text in ["chrI\t5000\n", "chrI\tlots\t6\n", "chrI\t10\t6\tx\n", "\t1\t2\n"] {
            let err = parse_fai(text).unwrap_err();
            assert!(
                matches!(err, Error::FormatError(FormatError::InvalidIndexLine { index: 0, .. })),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_empty_index() -> Result<()> {
        assert!(parse_fai("")?.is_empty());
        Ok(())
    }
}
