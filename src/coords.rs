//! Coordinate maps between a gapped alignment row and its ungapped reference
//!
//! Both maps are built in a single pass over the alignment row. A running reference
//! counter starts at 1 and advances after every non-gap character; the coordinate
//! attributed to a column is the counter on a base and the previous coordinate on a
//! gap, floored at 1 so that leading gaps never refer to a base 0.

use std::ops::Index;

/// Gap character in alignment rows
pub const GAP: u8 = b'-';

/// A dense lookup table between two coordinate spaces
///
/// Slot 0 is always the sentinel value 0. Values are non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionMap {
    positions: Vec<usize>,
}
impl PositionMap {
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<usize> {
        self.positions.get(idx).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.positions
    }
}
impl Index<usize> for PositionMap {
    type Output = usize;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.positions[idx]
    }
}
impl AsRef<[usize]> for PositionMap {
    fn as_ref(&self) -> &[usize] {
        &self.positions
    }
}

#[inline]
fn reference_at(base: u8, counter: usize) -> usize {
    if base == GAP {
        (counter - 1).max(1)
    } else {
        counter.max(1)
    }
}

/// Number of non-gap characters in an alignment row
#[must_use]
pub fn ungapped_len(alignment: &str) -> usize {
    alignment.bytes().filter(|&b| b != GAP).count()
}

/// Locates every reference base within the alignment row
///
/// The map is indexed by 1-based reference coordinate and holds the 0-based
/// alignment column that first produced that coordinate. Later columns attributed
/// to an already placed coordinate (gaps following it) leave it unchanged.
///
/// Its length is the number of non-gap characters plus the sentinel slot.
///
/// ```
/// use seqmap::coords::alignment_to_reference;
/// assert_eq!(alignment_to_reference("AC-GT").as_slice(), &[0, 0, 1, 3, 4]);
/// ```
#[must_use]
pub fn alignment_to_reference(alignment: &str) -> PositionMap {
    let mut positions = vec![0usize; ungapped_len(alignment) + 1];
    let mut counter = 1usize;
    let mut placed = 0usize;
    for (column, base) in alignment.bytes().enumerate() {
        let ref_pos = reference_at(base, counter);
        if ref_pos > placed && ref_pos < positions.len() {
            positions[ref_pos] = column;
            placed = ref_pos;
        }
        if base != GAP {
            counter += 1;
        }
    }
    PositionMap { positions }
}

/// Attributes a reference coordinate to every alignment column
///
/// The map is indexed by 1-based alignment column; slot 0 is the sentinel 0. Every
/// column is written: a gap column repeats the previous reference coordinate, or 1
/// before the first base.
///
/// ```
/// use seqmap::coords::reference_to_alignment;
/// assert_eq!(reference_to_alignment("AC-GT").as_slice(), &[0, 1, 2, 2, 3, 4]);
/// ```
#[must_use]
pub fn reference_to_alignment(alignment: &str) -> PositionMap {
    let mut positions = Vec::with_capacity(alignment.len() + 1);
    positions.push(0);
    let mut counter = 1usize;
    for base in alignment.bytes() {
        positions.push(reference_at(base, counter));
        if base != GAP {
            counter += 1;
        }
    }
    PositionMap { positions }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn alignment_row() -> impl Strategy<Value = String> {
        "[ACGTN-]{1,200}".prop_filter("needs a base", |s| s.bytes().any(|b| b != GAP))
    }

    proptest! {
        #[test]
        fn maps_are_non_decreasing(row in alignment_row()) {
            let a2r = alignment_to_reference(&row);
            let r2a = reference_to_alignment(&row);
            prop_assert!(a2r.as_slice()[1..].windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(r2a.as_slice().windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn values_bounded_by_base_count(row in alignment_row()) {
            let bases = ungapped_len(&row);
            let r2a = reference_to_alignment(&row);
            prop_assert!(r2a.as_slice().iter().all(|&v| v <= bases));
            prop_assert_eq!(r2a.len(), row.len() + 1);
            prop_assert_eq!(alignment_to_reference(&row).len(), bases + 1);
        }

        #[test]
        fn maps_invert_at_base_columns(row in alignment_row()) {
            let a2r = alignment_to_reference(&row);
            let r2a = reference_to_alignment(&row);
            let mut seen = 0usize;
            for (column, base) in row.bytes().enumerate() {
                if base == GAP {
                    continue;
                }
                seen += 1;
                let ref_pos = r2a[column + 1];
                prop_assert_eq!(ref_pos, seen);
                // a base column maps back to itself unless leading gaps claimed base 1
                if seen > 1 || a2r[1] == column {
                    prop_assert_eq!(a2r[ref_pos], column);
                } else {
                    prop_assert!(a2r[1] < column);
                }
            }
        }
    }
}
