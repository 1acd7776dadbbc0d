//! Lookup of reference sequences by sequence id

use std::collections::HashMap;
use std::hash::BuildHasher;

use auto_impl::auto_impl;
use indexmap::IndexMap;

use crate::FastaRecord;

/// A read-only mapping from sequence id to raw sequence
#[auto_impl(&, Box, Arc)]
pub trait GenomeSource {
    /// The sequence stored under `seqid`, if any
    fn sequence(&self, seqid: &str) -> Option<&str>;

    fn contains(&self, seqid: &str) -> bool {
        self.sequence(seqid).is_some()
    }
}

impl<S: BuildHasher> GenomeSource for HashMap<String, String, S> {
    fn sequence(&self, seqid: &str) -> Option<&str> {
        self.get(seqid).map(String::as_str)
    }
}

impl<S: BuildHasher> GenomeSource for IndexMap<String, String, S> {
    fn sequence(&self, seqid: &str) -> Option<&str> {
        self.get(seqid).map(String::as_str)
    }
}

impl<S: BuildHasher> GenomeSource for HashMap<String, FastaRecord, S> {
    fn sequence(&self, seqid: &str) -> Option<&str> {
        self.get(seqid).map(|r| r.sequence.as_str())
    }
}

impl<S: BuildHasher> GenomeSource for IndexMap<String, FastaRecord, S> {
    fn sequence(&self, seqid: &str) -> Option<&str> {
        self.get(seqid).map(|r| r.sequence.as_str())
    }
}
