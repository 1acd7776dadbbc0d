//! # extract
//!
//! Strand-aware extraction of annotated features from a reference genome.
//!
//! A gene id selects every feature of the requested type whose `ID` attribute starts
//! with it, so isoforms such as `g1.t1` and `g1.t2` are all returned for `g1`. Each
//! match is sliced from its reference sequence over an extraction window (the
//! feature's own coordinates unless a window function widens them) and reverse
//! complemented when the feature lies on the minus strand and the caller asked for it.
//!
//! ```
//! use seqmap::extract::{extract_gene_sequences, ExtractOptions};
//! use seqmap::gff::{GeneFeature, Strand};
//! use std::collections::HashMap;
//!
//! let mut genome = HashMap::new();
//! genome.insert("chr1".to_string(), "ATGCCCGGGTAA".to_string());
//! let features = vec![GeneFeature::new("chr1", "gene", 1, 12, Strand::Reverse)
//!     .with_attribute("ID", "g1")];
//!
//! let options = ExtractOptions::builder().auto_reverse_complement(true).build();
//! let results = extract_gene_sequences("g1", &genome, &features, &options).unwrap();
//! assert_eq!(results[0].sequence, "TTACCCGGGCAT");
//! assert!(results[0].header.contains("[reverse] [complement]"));
//! ```

mod batch;

use std::fmt;
use std::sync::Arc;

pub use batch::extract_batch;

use crate::complement::complement_strict;
use crate::error::{AmbiguityError, LookupError, Result};
use crate::genome::GenomeSource;
use crate::gff::{FeatureStore, GeneFeature, Strand};

/// Feature type selected when none is configured
pub const DEFAULT_FEATURE_TYPE: &str = "gene";

/// Extraction window in 1-based inclusive reference coordinates
///
/// Coordinates are signed so that a window function may reach past either end of
/// the reference; slicing clamps to the sequence while headers keep the requested
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
    /// Annotation for the 5' end, reported verbatim in the header
    pub relative_5prime: Option<i64>,
    /// Annotation for the 3' end, reported verbatim in the header
    pub relative_3prime: Option<i64>,
}
impl Window {
    /// The feature's own coordinates without relative markers
    #[must_use]
    pub fn native(start: u64, end: u64) -> Self {
        Self {
            start: start as i64,
            end: end as i64,
            relative_5prime: None,
            relative_3prime: None,
        }
    }
}

/// Computes a [`Window`] from `(start, end, is_reverse_complemented)`
pub type WindowFn = dyn Fn(u64, u64, bool) -> Window + Send + Sync;

/// A window function adding flanking sequence on both sides of a feature
///
/// `upstream` and `downstream` are taken relative to the transcript: on a reverse
/// complemented feature the upstream flank lies past its end.
///
/// ```
/// use seqmap::extract::flank_window;
///
/// let window = flank_window(500, 100);
/// let fwd = window(1000, 2000, false);
/// assert_eq!((fwd.start, fwd.end), (500, 2100));
/// let rev = window(1000, 2000, true);
/// assert_eq!((rev.start, rev.end), (900, 2500));
/// assert_eq!((rev.relative_5prime, rev.relative_3prime), (Some(-500), Some(100)));
/// ```
#[must_use]
pub fn flank_window(
    upstream: u64,
    downstream: u64,
) -> impl Fn(u64, u64, bool) -> Window + Send + Sync + 'static {
    let up = upstream as i64;
    let down = downstream as i64;
    move |start, end, is_reverse| {
        let (start, end) = (start as i64, end as i64);
        let (start, end) = if is_reverse {
            (start - down, end + up)
        } else {
            (start - up, end + down)
        };
        Window {
            start,
            end,
            relative_5prime: Some(-up),
            relative_3prime: Some(down),
        }
    }
}

/// Settings for [`extract_gene_sequences`] and [`extract_batch`]
#[derive(Clone)]
pub struct ExtractOptions {
    feature_type: String,
    auto_reverse_complement: bool,
    window: Option<Arc<WindowFn>>,
}
impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            feature_type: DEFAULT_FEATURE_TYPE.to_string(),
            auto_reverse_complement: false,
            window: None,
        }
    }
}
impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("feature_type", &self.feature_type)
            .field("auto_reverse_complement", &self.auto_reverse_complement)
            .field("window", &self.window.as_ref().map(|_| "Fn"))
            .finish()
    }
}
impl ExtractOptions {
    #[must_use]
    pub fn builder() -> ExtractOptionsBuilder {
        ExtractOptionsBuilder::default()
    }

    #[must_use]
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    #[must_use]
    pub fn auto_reverse_complement(&self) -> bool {
        self.auto_reverse_complement
    }

    /// The window to slice for a feature
    fn window_for(&self, feature: &GeneFeature, is_reverse: bool) -> Window {
        match &self.window {
            Some(window) => window(feature.start, feature.end, is_reverse),
            None => Window::native(feature.start, feature.end),
        }
    }
}

/// Builder for [`ExtractOptions`]
///
/// ```
/// use seqmap::extract::ExtractOptions;
///
/// let options = ExtractOptions::builder()
///     .feature_type("mRNA")
///     .auto_reverse_complement(true)
///     .flanks(500, 100)
///     .build();
/// assert_eq!(options.feature_type(), "mRNA");
/// ```
#[derive(Default)]
pub struct ExtractOptionsBuilder {
    feature_type: Option<String>,
    auto_reverse_complement: Option<bool>,
    window: Option<Arc<WindowFn>>,
}
impl ExtractOptionsBuilder {
    #[must_use]
    pub fn feature_type(mut self, feature_type: &str) -> Self {
        self.feature_type = Some(feature_type.to_string());
        self
    }

    /// Reverse complement features on the minus strand
    #[must_use]
    pub fn auto_reverse_complement(mut self, auto_reverse_complement: bool) -> Self {
        self.auto_reverse_complement = Some(auto_reverse_complement);
        self
    }

    #[must_use]
    pub fn window<F>(mut self, window: F) -> Self
    where
        F: Fn(u64, u64, bool) -> Window + Send + Sync + 'static,
    {
        self.window = Some(Arc::new(window));
        self
    }

    /// Shorthand for `.window(flank_window(upstream, downstream))`
    #[must_use]
    pub fn flanks(self, upstream: u64, downstream: u64) -> Self {
        self.window(flank_window(upstream, downstream))
    }

    #[must_use]
    pub fn build(self) -> ExtractOptions {
        ExtractOptions {
            feature_type: self
                .feature_type
                .unwrap_or_else(|| DEFAULT_FEATURE_TYPE.to_string()),
            auto_reverse_complement: self.auto_reverse_complement.unwrap_or(false),
            window: self.window,
        }
    }
}

/// One extracted feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// The gene id that selected this feature
    pub gene_id: String,
    pub feature: GeneFeature,
    /// Requested window start (1-based, possibly outside the reference)
    pub window_start: i64,
    /// Requested window end (1-based inclusive)
    pub window_end: i64,
    /// The window equals the feature's own coordinates
    pub is_gene_sequence: bool,
    pub reverse_complemented: bool,
    /// FASTA header without the leading `>`
    pub header: String,
    pub sequence: String,
}

/// Extracts every feature matching `gene_id` from `genome`
///
/// Features are selected when their type equals the configured feature type and
/// their `ID` attribute starts with `gene_id`. Results follow feature order.
///
/// # Errors
///
/// Returns [`LookupError::MissingSequence`] if a matched feature's `seqid` is absent
/// from `genome`. No matching feature is not an error: the result is empty.
pub fn extract_gene_sequences<G, F>(
    gene_id: &str,
    genome: &G,
    features: &F,
    options: &ExtractOptions,
) -> Result<Vec<ExtractionResult>>
where
    G: GenomeSource + ?Sized,
    F: FeatureStore + ?Sized,
{
    let mut results = Vec::new();
    let mut translater = itoa::Buffer::new();

    for feature in features.features() {
        if feature.feature_type != options.feature_type
            || !feature.id().is_some_and(|id| id.starts_with(gene_id))
        {
            continue;
        }

        let reference =
            genome
                .sequence(&feature.seqid)
                .ok_or_else(|| LookupError::MissingSequence {
                    gene_id: gene_id.to_string(),
                    seqid: feature.seqid.clone(),
                })?;

        let is_reverse = options.auto_reverse_complement && feature.strand.is_reverse();
        let window = options.window_for(feature, is_reverse);
        let slice = slice_window(reference, &window);
        let sequence = if is_reverse {
            complement_strict(slice)
        } else {
            slice.to_string()
        };

        let header = build_header(gene_id, feature, &window, is_reverse, &mut translater);
        results.push(ExtractionResult {
            gene_id: gene_id.to_string(),
            feature: feature.clone(),
            window_start: window.start,
            window_end: window.end,
            is_gene_sequence: window.start == feature.start as i64
                && window.end == feature.end as i64,
            reverse_complemented: is_reverse,
            header,
            sequence,
        });
    }
    Ok(results)
}

/// Slices the zero-based half-open range `[start - 1, end)` clamped to `reference`
fn slice_window<'a>(reference: &'a str, window: &Window) -> &'a str {
    let len = reference.len() as i64;
    let lo = (window.start - 1).clamp(0, len);
    let hi = window.end.clamp(0, len);
    if lo != window.start - 1 || hi != window.end {
        log::debug!(
            "window {}..={} clamped to reference of length {len}",
            window.start,
            window.end
        );
    }
    if lo >= hi {
        return "";
    }
    reference.get(lo as usize..hi as usize).unwrap_or_default()
}

fn build_header(
    gene_id: &str,
    feature: &GeneFeature,
    window: &Window,
    is_reverse: bool,
    translater: &mut itoa::Buffer,
) -> String {
    let mut header = String::new();
    let mut push = |token: &str| {
        if token.is_empty() {
            return;
        }
        if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(token);
    };

    push(feature.id().unwrap_or_default());
    push(feature.name().unwrap_or_default());

    let mut location = String::from(gene_id);
    location.push(':');
    location.push_str(translater.format(feature.start));
    location.push('-');
    location.push_str(translater.format(feature.end));
    location.push(':');
    location.push_str(feature.strand.symbol());
    push(&location);

    if is_reverse {
        push("[reverse] [complement]");
    }

    let mut span = feature.seqid.clone();
    span.push('_');
    span.push_str(translater.format(window.start));
    span.push('_');
    span.push_str(translater.format(window.end));
    push(&span);

    let relative = match (window.relative_5prime, window.relative_3prime) {
        (Some(five), Some(three)) => format!("[relative 5' {five}]-[relative 3' {three}]"),
        (Some(five), None) => format!("[relative 5' {five}]"),
        (None, Some(three)) => format!("[relative 3' {three}]"),
        (None, None) => String::new(),
    };
    push(&relative);

    header
}

/// Picks one representative among the isoforms extracted for a single gene
///
/// The strand of the first result decides: on the minus strand the result with the
/// largest feature end wins (earliest on ties), on the plus strand the first result
/// wins. A single result is always its own representative.
///
/// # Errors
///
/// Returns [`AmbiguityError::UnknownStrand`] if there are several results and the
/// first one has no strand.
pub fn select_representative(results: &[ExtractionResult]) -> Result<Option<&ExtractionResult>> {
    let Some(first) = results.first() else {
        return Ok(None);
    };
    if results.len() == 1 {
        return Ok(Some(first));
    }
    match first.feature.strand {
        Strand::Forward => Ok(Some(first)),
        Strand::Reverse => Ok(results
            .iter()
            .reduce(|best, r| if r.feature.end > best.feature.end { r } else { best })),
        Strand::Unknown => Err(AmbiguityError::UnknownStrand {
            gene_id: first.gene_id.clone(),
            candidates: results.len(),
        }
        .into()),
    }
}
