//! Reverse complement of nucleotide sequences
//!
//! Both variants share one process-wide lookup table and differ only in their
//! [`UnknownPolicy`]:
//!
//! * [`complement_strict`] audits every base that is absent from the table or
//!   complements to `N`/`n`, logging one warning per distinct character with its count
//!   and share of the input. Bases absent from the table are dropped from the output.
//! * [`complement_permissive`] passes characters absent from the table through
//!   unchanged and reports nothing.

use indexmap::IndexMap;

/// Case-preserving complement of `A/C/G/T/N`; 0 marks bytes absent from the table
static COMPLEMENT: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let pairs: [(u8, u8); 5] = [(b'A', b'T'), (b'T', b'A'), (b'C', b'G'), (b'G', b'C'), (b'N', b'N')];
    let mut i = 0;
    while i < pairs.len() {
        let (from, to) = pairs[i];
        table[from as usize] = to;
        table[from.to_ascii_lowercase() as usize] = to.to_ascii_lowercase();
        i += 1;
    }
    table
}

/// Complement of a single character, if it is in the table
#[inline]
#[must_use]
pub fn complement(base: char) -> Option<char> {
    if base.is_ascii() {
        match COMPLEMENT[base as usize] {
            0 => None,
            c => Some(c as char),
        }
    } else {
        None
    }
}

/// Handling of characters that are unknown or ambiguous
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Tally unknown and ambiguous bases and drop unknown ones from the output
    #[default]
    Audit,
    /// Copy unknown characters to the output untouched
    PassThrough,
}

/// Occurrences of one unknown or ambiguous character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnknownBase {
    pub base: char,
    pub count: usize,
    /// Share of the input length, in percent
    pub percent: f64,
}

/// Output of [`reverse_complement_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct Complemented {
    pub sequence: String,

    /// Distinct unknown or ambiguous characters, in order of first appearance in
    /// the reversed input. Always empty under [`UnknownPolicy::PassThrough`].
    pub unknown: Vec<UnknownBase>,
}
impl Complemented {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }

    /// One message per distinct unknown character, empty for a clean result
    ///
    /// Characters dropped from the output are always tallied, so a clean result
    /// also has the length of its input.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<String> {
        self.unknown
            .iter()
            .map(|u| format!("found {}: {}, {:.2}%", u.base, u.count, u.percent))
            .collect()
    }
}

/// Reverses `seq` and complements each base according to `policy`
#[must_use]
pub fn reverse_complement_with(seq: &str, policy: UnknownPolicy) -> Complemented {
    let mut sequence = String::with_capacity(seq.len());
    let mut tally: IndexMap<char, usize> = IndexMap::new();
    let mut total = 0usize;

    for base in seq.chars().rev() {
        total += 1;
        match (complement(base), policy) {
            (Some(c), UnknownPolicy::Audit) => {
                if c == 'N' || c == 'n' {
                    *tally.entry(base).or_default() += 1;
                }
                sequence.push(c);
            }
            (Some(c), UnknownPolicy::PassThrough) => sequence.push(c),
            (None, UnknownPolicy::Audit) => *tally.entry(base).or_default() += 1,
            (None, UnknownPolicy::PassThrough) => sequence.push(base),
        }
    }

    let unknown = tally
        .into_iter()
        .map(|(base, count)| UnknownBase {
            base,
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect();
    Complemented { sequence, unknown }
}

/// Reverse complement with an audit of unknown and ambiguous bases
///
/// Emits one `warn` diagnostic per distinct unknown character. The diagnostics
/// never fail the call.
///
/// ```
/// use seqmap::complement::complement_strict;
/// assert_eq!(complement_strict("ATGCCCGGGTAA"), "TTACCCGGGCAT");
/// ```
#[must_use]
pub fn complement_strict(seq: &str) -> String {
    let result = reverse_complement_with(seq, UnknownPolicy::Audit);
    for message in result.diagnostics() {
        log::warn!("{message}");
    }
    result.sequence
}

/// Best-effort reverse complement: unknown characters pass through unchanged
///
/// ```
/// use seqmap::complement::complement_permissive;
/// assert_eq!(complement_permissive("AARYc"), "gYRTT");
/// ```
#[must_use]
pub fn complement_permissive(seq: &str) -> String {
    reverse_complement_with(seq, UnknownPolicy::PassThrough).sequence
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn strict_is_an_involution(seq in "[ACGTNacgtn]{0,300}") {
            prop_assert_eq!(complement_strict(&complement_strict(&seq)), seq);
        }

        #[test]
        fn permissive_preserves_length(seq in "\\PC{0,100}") {
            let out = complement_permissive(&seq);
            prop_assert_eq!(out.chars().count(), seq.chars().count());
        }
    }
}
