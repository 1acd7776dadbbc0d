//! Record module for the seqmap library
//!
//! A [`FastaRecord`] holds one parsed sequence entry: its identifier, the full header
//! line and the concatenated sequence payload. Records produced by the whole-text
//! parser additionally carry [`FastaAttributes`] read from `[key=value]` header tags.

use std::fmt;

use regex::Regex;

use crate::error::Result;

/// One sequence entry of a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Primary identifier (first token of the header)
    pub id: String,

    /// Full header line without the leading `>`
    pub header: String,

    /// Sequence payload with all whitespace removed
    pub sequence: String,

    /// Metadata parsed from bracket tags in the header
    ///
    /// Only populated by the whole-text parser.
    pub attributes: Option<FastaAttributes>,
}
impl FastaRecord {
    #[must_use]
    pub fn new(id: String, header: String, sequence: String) -> Self {
        Self {
            id,
            header,
            sequence,
            attributes: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: FastaAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Number of bases in the sequence payload
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Where a sequence lives in the cell (`[location=...]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Chromosome,
    Mitochondrion,
}
impl Location {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "chromosome" => Some(Self::Chromosome),
            "mitochondrion" => Some(Self::Mitochondrion),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chromosome => "chromosome",
            Self::Mitochondrion => "mitochondrion",
        }
    }
}

/// Molecule topology (`[top=...]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Circular,
}
impl Topology {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "circular" => Some(Self::Circular),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circular => "circular",
        }
    }
}

/// Header metadata carried in `[key=value]` tags
///
/// Only the keys `location`, `chromosome` and `top` are recognized. A missing tag,
/// or a value outside the recognized set, leaves the field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaAttributes {
    pub location: Option<Location>,

    /// Roman numeral chromosome label (I, II, III, ...)
    pub chromosome: Option<String>,

    pub top: Option<Topology>,
}
impl FastaAttributes {
    /// Reads the recognized tags of a single header
    ///
    /// Compiles the tag patterns on every call; reuse an [`AttributeMatcher`] when
    /// reading many headers.
    pub fn from_header(header: &str) -> Result<Self> {
        Ok(AttributeMatcher::new()?.extract(header))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.chromosome.is_none() && self.top.is_none()
    }
}
impl fmt::Display for FastaAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = [
            self.location.map(|v| ("location", v.as_str())),
            self.chromosome.as_deref().map(|v| ("chromosome", v)),
            self.top.map(|v| ("top", v.as_str())),
        ];
        let mut first = true;
        for (key, value) in tags.into_iter().flatten() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "[{key}={value}]")?;
            first = false;
        }
        Ok(())
    }
}

/// Compiled lookups for the recognized header tags
///
/// Each key is matched independently so tag order in the header does not matter.
#[derive(Debug, Clone)]
pub struct AttributeMatcher {
    location: Regex,
    chromosome: Regex,
    top: Regex,
}
impl AttributeMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            location: tag_pattern("location")?,
            chromosome: tag_pattern("chromosome")?,
            top: tag_pattern("top")?,
        })
    }

    /// Reads the recognized tags out of a header line
    #[must_use]
    pub fn extract(&self, header: &str) -> FastaAttributes {
        let location = tag_value(&self.location, header).and_then(|v| {
            let parsed = Location::parse(v);
            if parsed.is_none() {
                log::debug!("ignoring unrecognized location '{v}'");
            }
            parsed
        });
        let top = tag_value(&self.top, header).and_then(|v| {
            let parsed = Topology::parse(v);
            if parsed.is_none() {
                log::debug!("ignoring unrecognized topology '{v}'");
            }
            parsed
        });
        FastaAttributes {
            location,
            chromosome: tag_value(&self.chromosome, header).map(str::to_string),
            top,
        }
    }
}

fn tag_pattern(key: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"\[{key}=([^\]]+)\]"))?)
}

fn tag_value<'h>(pattern: &Regex, header: &'h str) -> Option<&'h str> {
    pattern
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
