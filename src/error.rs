/// Custom Result type for seqmap operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the seqmap library, encompassing all possible error cases
/// that can occur while parsing, mapping, or extracting sequences.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Input text is not in the expected format
    FormatError(#[from] FormatError),
    /// A referenced sequence is missing from the genome
    LookupError(#[from] LookupError),
    /// Several candidates exist and no deterministic choice is possible
    AmbiguityError(#[from] AmbiguityError),
    /// Errors that occur while opening input files
    ReadError(#[from] ReadError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// UTF-8 encoding/decoding errors
    Utf8Error(#[from] std::str::Utf8Error),
    /// Errors compiling one of the header attribute patterns
    PatternError(#[from] regex::Error),
}

/// Errors that can occur while opening sequence files
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The path being read is not a regular file (e.g., a directory or special file)
    ///
    /// # Arguments
    /// * `String` - The offending path
    #[error("File is not regular: {0}")]
    IncompatibleFile(String),
}

/// Errors raised when input text cannot be interpreted
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// A line outside of any record started with something other than `>`
    ///
    /// # Fields
    /// * `code` - The code point of the offending first character
    /// * `line` - The raw offending line
    /// * `index` - 0-based line index
    #[error("Unexpected char: {code} at line {index}: {line:?}")]
    UnexpectedCharacter {
        code: u32,
        line: String,
        index: usize,
    },

    /// A header line has no identifier token before the first whitespace
    #[error("Header at line {index} has no sequence identifier: {line:?}")]
    MissingIdentifier { line: String, index: usize },

    /// No record marker was found anywhere in the input
    #[error("not a FASTA file")]
    NotFasta,

    /// A line of a `.fai` index could not be read
    #[error("Invalid FASTA index line {index}: {line:?}")]
    InvalidIndexLine { line: String, index: usize },

    /// A GFF3 feature line could not be read
    #[error("Invalid GFF3 line {index} ({reason}): {line:?}")]
    InvalidFeatureLine {
        line: String,
        index: usize,
        reason: &'static str,
    },
}

/// Errors raised when a referenced sequence is absent
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// The feature's `seqid` is not present in the genome
    #[error("Sequence '{seqid}' referenced by gene '{gene_id}' was not found in the genome")]
    MissingSequence { gene_id: String, seqid: String },
}

/// Errors raised when several candidates cannot be disambiguated
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AmbiguityError {
    /// Multiple isoforms matched a gene whose strand is unknown
    #[error("Gene '{gene_id}' has {candidates} isoform candidates on an unknown strand")]
    UnknownStrand { gene_id: String, candidates: usize },
}
