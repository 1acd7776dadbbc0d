//! Genome feature records and the stores they are queried from
//!
//! Coordinates are kept exactly as GFF3 writes them: 1-based, inclusive, on the plus
//! strand of `seqid` whatever the feature's own strand.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use auto_impl::auto_impl;

use crate::error::{FormatError, Result};

/// Orientation of a feature relative to the reference plus strand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}
impl Strand {
    /// Reads the GFF3 strand column (`+`, `-`, `.` or `?`)
    #[must_use]
    pub fn from_gff(column: &str) -> Self {
        match column {
            "+" => Self::Forward,
            "-" => Self::Reverse,
            _ => Self::Unknown,
        }
    }

    /// `+1`, `-1` or `0`
    #[must_use]
    pub fn sign(&self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
            Self::Unknown => 0,
        }
    }

    /// `+`, `-` or empty for an unknown strand
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Forward => "+",
            Self::Reverse => "-",
            Self::Unknown => "",
        }
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        matches!(self, Self::Reverse)
    }
}
impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single annotated feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneFeature {
    pub seqid: String,
    pub feature_type: String,
    /// 1-based inclusive start, `start <= end`
    pub start: u64,
    /// 1-based inclusive end
    pub end: u64,
    pub strand: Strand,
    pub attributes: HashMap<String, String>,
}
impl GeneFeature {
    #[must_use]
    pub fn new(seqid: &str, feature_type: &str, start: u64, end: u64, strand: Strand) -> Self {
        Self {
            seqid: seqid.to_string(),
            feature_type: feature_type.to_string(),
            start,
            end,
            strand,
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// The `ID` attribute
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("ID").map(String::as_str)
    }

    /// The `Name` attribute
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("Name").map(String::as_str)
    }
}

/// Read-only access to a collection of features
#[auto_impl(&, Box, Arc)]
pub trait FeatureStore {
    /// All features, in file order
    fn features(&self) -> &[GeneFeature];

    /// Features located on `seqid`, in file order
    fn by_seqid(&self, seqid: &str) -> Vec<&GeneFeature> {
        self.features()
            .iter()
            .filter(|f| f.seqid == seqid)
            .collect()
    }
}

impl FeatureStore for [GeneFeature] {
    fn features(&self) -> &[GeneFeature] {
        self
    }
}

impl FeatureStore for Vec<GeneFeature> {
    fn features(&self) -> &[GeneFeature] {
        self
    }
}

/// Features parsed from GFF3 text, indexed by `seqid`
#[derive(Debug, Clone, Default)]
pub struct GffStore {
    features: Vec<GeneFeature>,
    by_seqid: HashMap<String, Vec<usize>>,
}
impl GffStore {
    #[must_use]
    pub fn new(features: Vec<GeneFeature>) -> Self {
        let mut by_seqid: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, feature) in features.iter().enumerate() {
            by_seqid.entry(feature.seqid.clone()).or_default().push(idx);
        }
        Self { features, by_seqid }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
impl FeatureStore for GffStore {
    fn features(&self) -> &[GeneFeature] {
        &self.features
    }

    fn by_seqid(&self, seqid: &str) -> Vec<&GeneFeature> {
        self.by_seqid
            .get(seqid)
            .map(|indices| indices.iter().map(|&i| &self.features[i]).collect())
            .unwrap_or_default()
    }
}

/// Parses GFF3 text into a [`GffStore`]
///
/// Comments and pragmas are skipped and parsing stops at a `##FASTA` section.
/// Attribute values are percent-decoded for the characters GFF3 reserves.
pub fn parse_gff3(text: &str) -> Result<GffStore> {
    let mut features = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if line == "##FASTA" {
            break;
        }
        if line.starts_with('#') {
            continue;
        }
        features.push(parse_line(line, index)?);
    }
    Ok(GffStore::new(features))
}

fn parse_line(line: &str, index: usize) -> Result<GeneFeature> {
    let invalid = |reason: &'static str| FormatError::InvalidFeatureLine {
        line: line.to_string(),
        index,
        reason,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(invalid("expected at least 8 tab-separated columns").into());
    }
    let start: u64 = fields[3].parse().map_err(|_| invalid("invalid start"))?;
    let end: u64 = fields[4].parse().map_err(|_| invalid("invalid end"))?;
    if start == 0 || start > end {
        return Err(invalid("start must be in 1..=end").into());
    }

    let mut feature = GeneFeature::new(
        fields[0],
        fields[2],
        start,
        end,
        Strand::from_gff(fields[6]),
    );
    if let Some(column) = fields.get(8) {
        for pair in column.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            if let Some((key, value)) = pair.split_once('=') {
                feature
                    .attributes
                    .insert(key.to_string(), percent_decode(value));
            }
        }
    }
    Ok(feature)
}

fn percent_decode(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(b) = decoded {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::Error;
    use anyhow::Result;

    const GFF: &str = "##gff-version 3\n\
chrI\tsrc\tgene\t100\t400\t.\t+\t.\tID=g1;Name=abc1\n\
chrI\tsrc\tmRNA\t100\t400\t.\t+\t.\tID=g1.t1;Parent=g1\n\
chrII\tsrc\tgene\t50\t90\t.\t-\t.\tID=g2;Note=a%3Bb\n\
# trailing comment\n\
##FASTA\n\
>chrI\n\
ACGT\n";

    #[test]
    fn test_parse_gff3() -> Result<()> {
        let store = parse_gff3(GFF)?;
        assert_eq!(store.len(), 3);

        let g1 = &store.features()[0];
        assert_eq!(g1.seqid, "chrI");
        assert_eq!(g1.feature_type, "gene");
        assert_eq!((g1.start, g1.end), (100, 400));
        assert_eq!(g1.strand, Strand::Forward);
        assert_eq!(g1.id(), Some("g1"));
        assert_eq!(g1.name(), Some("abc1"));

        let g2 = &store.features()[2];
        assert_eq!(g2.strand, Strand::Reverse);
        assert_eq!(g2.attributes["Note"], "a;b");
        Ok(())
    }

    #[test]
    fn test_by_seqid() -> Result<()> {
        let store = parse_gff3(GFF)?;
        assert_eq!(store.by_seqid("chrI").len(), 2);
        assert_eq!(store.by_seqid("chrII").len(), 1);
        assert!(store.by_seqid("chrIII").is_empty());

        // forwarding impls agree with the store
        let shared = store.clone().into_shared();
        assert_eq!(shared.by_seqid("chrI").len(), 2);
        let features = store.features().to_vec();
        assert_eq!(features.by_seqid("chrII").len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_lines() {
        let err = parse_gff3("chrI\tsrc\tgene\t400\t100\t.\t+\t.\tID=g\n").unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::InvalidFeatureLine { index: 0, .. })
        ));
        assert!(parse_gff3("chrI\tsrc\tgene\n").is_err());
        assert!(parse_gff3("chrI\tsrc\tgene\tx\t10\t.\t+\t.\t\n").is_err());
    }

    #[test]
    fn test_strand_symbols() {
        assert_eq!(Strand::from_gff(".").symbol(), "");
        assert_eq!(Strand::from_gff("?"), Strand::Unknown);
        assert_eq!(Strand::Reverse.sign(), -1);
        assert_eq!(Strand::Forward.to_string(), "+");
    }
}
