//! Whole-collection operations backing the command line tools

use std::collections::HashSet;

use crate::fasta::FastaCollection;
use crate::FastaRecord;

/// Total number of bases across a collection
#[must_use]
pub fn total_length(collection: &FastaCollection) -> u64 {
    collection.values().map(|r| r.len() as u64).sum()
}

/// Reads an id list: the first tab-separated column of every non-empty line
#[must_use]
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Records named in `ids`, in list order
///
/// Ids absent from the collection are skipped; repeated ids are kept once.
#[must_use]
pub fn select_by_ids<S: AsRef<str>>(collection: &FastaCollection, ids: &[S]) -> FastaCollection {
    let mut selected = FastaCollection::new();
    for id in ids {
        let id = id.as_ref();
        match collection.get(id) {
            Some(record) => {
                selected.insert(id.to_string(), record.clone());
            }
            None => log::debug!("{id}: not in collection"),
        }
    }
    selected
}

/// Records not named in `ids`, in collection order
#[must_use]
pub fn exclude_by_ids<S: AsRef<str>>(collection: &FastaCollection, ids: &[S]) -> FastaCollection {
    let excluded: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    collection
        .iter()
        .filter(|(key, _)| !excluded.contains(key.as_str()))
        .map(|(key, record)| (key.clone(), record.clone()))
        .collect()
}

/// Reorders a collection: listed ids first in list order, then the rest unchanged
#[must_use]
pub fn sort_by_ids<S: AsRef<str>>(collection: &FastaCollection, ids: &[S]) -> FastaCollection {
    let mut sorted = select_by_ids(collection, ids);
    for (key, record) in collection {
        if !sorted.contains_key(key) {
            sorted.insert(key.clone(), record.clone());
        }
    }
    sorted
}

/// Concatenates the sequences stored under the same key across collections
///
/// Keys are those of the first collection; a key missing from a later collection
/// contributes nothing.
#[must_use]
pub fn join_sequences(collections: &[FastaCollection]) -> FastaCollection {
    let Some((first, rest)) = collections.split_first() else {
        return FastaCollection::new();
    };
    first
        .iter()
        .map(|(key, record)| {
            let mut joined = record.clone();
            for other in rest {
                if let Some(more) = other.get(key) {
                    joined.sequence.push_str(&more.sequence);
                }
            }
            (key.clone(), joined)
        })
        .collect()
}

/// Records whose id starts with `gene_id` or whose header mentions it
#[must_use]
pub fn matching_isoforms<'a>(collection: &'a FastaCollection, gene_id: &str) -> Vec<&'a FastaRecord> {
    collection
        .values()
        .filter(|r| r.id.starts_with(gene_id) || r.header.contains(gene_id))
        .collect()
}

/// Splits a collection into consecutive chunks of at most `per_chunk` records
///
/// A `per_chunk` of zero yields no chunks.
#[must_use]
pub fn split_chunks(collection: &FastaCollection, per_chunk: usize) -> Vec<FastaCollection> {
    if per_chunk == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::with_capacity(collection.len().div_ceil(per_chunk));
    let mut current = FastaCollection::with_capacity(per_chunk);
    for (key, record) in collection {
        current.insert(key.clone(), record.clone());
        if current.len() == per_chunk {
            chunks.push(std::mem::replace(
                &mut current,
                FastaCollection::with_capacity(per_chunk),
            ));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Records per chunk when splitting `num_records` into roughly `parts` files
///
/// Always rounds up past an exact division, so `parts` is an upper bound on the
/// resulting number of chunks.
#[must_use]
pub fn chunk_size_for_parts(num_records: usize, parts: usize) -> usize {
    num_records / parts.max(1) + 1
}

/// Zero-padded 1-based chunk label, as wide as the largest label
///
/// ```
/// use seqmap::ops::chunk_label;
/// assert_eq!(chunk_label(3, 12), "03");
/// assert_eq!(chunk_label(12, 12), "12");
/// ```
#[must_use]
pub fn chunk_label(index: usize, total_chunks: usize) -> String {
    let mut digits = itoa::Buffer::new();
    let width = digits.format(total_chunks.max(1)).len();
    format!("{index:0width$}")
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::fasta::parse_strict;
    use anyhow::Result;

    fn keys(collection: &FastaCollection) -> Vec<&str> {
        collection.keys().map(String::as_str).collect()
    }

    fn fixture() -> Result<FastaCollection> {
        Ok(parse_strict(
            ">a1 first\nAC\n>b1 second\nGGG\n>a2 third isoform of a1\nT\n>c1\nACGT\n",
        )?)
    }

    #[test]
    fn test_total_length() -> Result<()> {
        assert_eq!(total_length(&fixture()?), 10);
        assert_eq!(total_length(&FastaCollection::new()), 0);
        Ok(())
    }

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("a1\tgene\n\n  c1 \nzz\textra\tcols\n");
        assert_eq!(ids, ["a1", "c1", "zz"]);
    }

    #[test]
    fn test_select_and_exclude() -> Result<()> {
        let fa = fixture()?;
        let selected = select_by_ids(&fa, &["c1", "missing", "a1"]);
        assert_eq!(keys(&selected), ["c1", "a1"]);

        let excluded = exclude_by_ids(&fa, &["b1", "missing"]);
        assert_eq!(keys(&excluded), ["a1", "a2", "c1"]);
        Ok(())
    }

    #[test]
    fn test_sort_by_ids() -> Result<()> {
        let sorted = sort_by_ids(&fixture()?, &["c1", "a2"]);
        assert_eq!(keys(&sorted), ["c1", "a2", "a1", "b1"]);
        Ok(())
    }

    #[test]
    fn test_join_sequences() -> Result<()> {
        let first = fixture()?;
        let second = parse_strict(">a1\nTT\n>c1\nNN\n>extra\nGG\n")?;
        let joined = join_sequences(&[first, second]);
        assert_eq!(keys(&joined), ["a1", "b1", "a2", "c1"]);
        assert_eq!(joined["a1"].sequence, "ACTT");
        assert_eq!(joined["b1"].sequence, "GGG");
        assert_eq!(joined["c1"].sequence, "ACGTNN");
        assert!(join_sequences(&[]).is_empty());
        Ok(())
    }

    #[test]
    fn test_matching_isoforms() -> Result<()> {
        let fa = fixture()?;
        let ids: Vec<_> = matching_isoforms(&fa, "a1").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2"]);
        Ok(())
    }

    #[test]
    fn test_split_chunks() -> Result<()> {
        let fa = fixture()?;
        let chunks = split_chunks(&fa, 3);
        assert_eq!(chunks.len(), 2);
        assert_eq!(keys(&chunks[0]), ["a1", "b1", "a2"]);
        assert_eq!(keys(&chunks[1]), ["c1"]);
        assert!(split_chunks(&fa, 0).is_empty());
        Ok(())
    }

    #[test]
    fn test_chunk_sizes_and_labels() {
        assert_eq!(chunk_size_for_parts(10, 3), 4);
        assert_eq!(chunk_size_for_parts(9, 3), 4);
        assert_eq!(chunk_size_for_parts(5, 0), 6);
        assert_eq!(chunk_label(1, 9), "1");
        assert_eq!(chunk_label(7, 100), "007");
    }
}
