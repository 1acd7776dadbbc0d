//! Motif sweeps over protein sequences
//!
//! * [`find_poly_residue`] finds impure homopolymer-like runs (poly-Q, poly-QN, ...).
//! * [`find_scd`] finds S/T-Q cluster domains.
//!
//! Positions are byte offsets, so sequences are expected to be ASCII.

use regex::Regex;

use crate::error::Result;

/// Default span limit for [`find_scd`]
pub const SCD_MAX_DISTANCE: usize = 100;

/// A segment rich in target residues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyRun {
    /// 0-based start
    pub start: usize,
    /// 0-based exclusive end
    pub end: usize,
    /// Number of target residues in the segment
    pub count: usize,
    pub length: usize,
    pub fragment: String,
}
impl PolyRun {
    /// The segment holds nothing but target residues
    #[must_use]
    pub fn is_pure(&self) -> bool {
        self.count == self.length
    }

    /// `"6"` for a pure run, `"6/8"` otherwise
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_pure() {
            self.count.to_string()
        } else {
            format!("{}/{}", self.count, self.length)
        }
    }
}

/// Finds segments holding at least `min_count` of `residues`
///
/// The sequence is cut at every run of `max_gap` or more consecutive non-target
/// residues; each remaining segment is reported if it is rich enough. Results are
/// sorted by start. An empty residue set finds nothing.
///
/// ```
/// use seqmap::motif::find_poly_residue;
///
/// let runs = find_poly_residue("MKQQAQQLLLLQNQQ", 4, "Q", 2).unwrap();
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].fragment, "QQAQQ");
/// assert_eq!(runs[0].label(), "4/5");
/// ```
///
/// # Errors
///
/// Returns an error if the separator pattern cannot be compiled.
pub fn find_poly_residue(
    seq: &str,
    min_count: usize,
    residues: &str,
    max_gap: usize,
) -> Result<Vec<PolyRun>> {
    if residues.is_empty() {
        return Ok(Vec::new());
    }
    let class: String = residues.chars().map(|c| regex::escape(&c.to_string())).collect();
    let separator = Regex::new(&format!("[^{class}]{{{},}}", max_gap.max(1)))?;

    let mut bounds = Vec::new();
    let mut cursor = 0;
    for sep in separator.find_iter(seq) {
        if sep.start() > cursor {
            bounds.push((cursor, sep.start()));
        }
        cursor = sep.end();
    }
    if cursor < seq.len() {
        bounds.push((cursor, seq.len()));
    }

    let runs = bounds
        .into_iter()
        .filter_map(|(start, end)| {
            let fragment = &seq[start..end];
            let count = fragment.chars().filter(|c| residues.contains(*c)).count();
            (count >= min_count).then(|| PolyRun {
                start,
                end,
                count,
                length: fragment.len(),
                fragment: fragment.to_string(),
            })
        })
        .collect();
    Ok(runs)
}

/// A cluster of at least three S/T-Q motifs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScdCluster {
    /// 1-based start of the first motif
    pub start: usize,
    /// 1-based inclusive end of the last motif
    pub end: usize,
    /// 0-based starts of every motif in the cluster
    pub positions: Vec<usize>,
    pub sequence: String,
}

const MOTIF_LEN: usize = 2;

/// Finds S/T-Q cluster domains
///
/// Every `SQ`/`TQ` motif opens a candidate cluster holding itself and all later
/// motifs that end within `max_distance` residues of its start. Candidates with at
/// least three motifs are reported, so overlapping clusters are expected.
#[must_use]
pub fn find_scd(seq: &str, max_distance: usize) -> Vec<ScdCluster> {
    let motifs: Vec<usize> = seq
        .as_bytes()
        .windows(MOTIF_LEN)
        .enumerate()
        .filter(|(_, w)| matches!(w, [b'S' | b'T', b'Q']))
        .map(|(i, _)| i)
        .collect();

    motifs
        .iter()
        .enumerate()
        .filter_map(|(head, &first)| {
            let positions: Vec<usize> = motifs[head..]
                .iter()
                .copied()
                .take_while(|&pos| pos + MOTIF_LEN - first <= max_distance)
                .collect();
            if positions.len() < 3 {
                return None;
            }
            let last_end = positions[positions.len() - 1] + MOTIF_LEN;
            Some(ScdCluster {
                start: first + 1,
                end: last_end,
                sequence: seq[first..last_end].to_string(),
                positions,
            })
        })
        .collect()
}

#[cfg(test)]
mod testing {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_poly_runs() -> Result<()> {
        // separators: "MK" (0..2) and "LLLL" (7..11)
        let runs = find_poly_residue("MKQQAQQLLLLQQQQ", 4, "Q", 2)?;
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (2, 7));
        assert_eq!(runs[0].fragment, "QQAQQ");
        assert!(!runs[0].is_pure());
        assert_eq!((runs[1].start, runs[1].end), (11, 15));
        assert!(runs[1].is_pure());
        assert_eq!(runs[1].label(), "4");
        Ok(())
    }

    #[test]
    fn test_leading_segment_keeps_its_last_residue() -> Result<()> {
        let runs = find_poly_residue("QQQQAA", 4, "Q", 2)?;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].fragment, "QQQQ");
        Ok(())
    }

    #[test]
    fn test_multiple_residues_and_no_separator() -> Result<()> {
        let runs = find_poly_residue("QNQNAQN", 5, "QN", 2)?;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].label(), "6/7");

        assert!(find_poly_residue("QQQQ", 4, "", 2)?.is_empty());
        assert!(find_poly_residue("", 1, "Q", 2)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_scd_clusters() {
        // motifs at 0, 4, 8 and 40
        let mut seq = String::from("SQAATQAASQ");
        seq.push_str(&"A".repeat(30));
        seq.push_str("TQ");

        let clusters = find_scd(&seq, SCD_MAX_DISTANCE);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].positions, [0, 4, 8, 40]);
        assert_eq!((clusters[0].start, clusters[0].end), (1, 42));
        assert_eq!(clusters[1].positions, [4, 8, 40]);

        let tight = find_scd(&seq, 10);
        assert_eq!(tight.len(), 1);
        assert_eq!(tight[0].sequence, "SQAATQAASQ");
        assert_eq!((tight[0].start, tight[0].end), (1, 10));
    }

    #[test]
    fn test_scd_needs_three_motifs() {
        assert!(find_scd("SQTQ", SCD_MAX_DISTANCE).is_empty());
        assert!(find_scd("", SCD_MAX_DISTANCE).is_empty());
    }
}
