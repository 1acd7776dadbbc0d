//! # fasta
//!
//! Parsing and serialization of FASTA text.
//!
//! Two parsers are provided:
//!
//! * [`parse_strict`] - a line-oriented state machine. Empty input yields an empty
//!   collection and any non-blank line outside a record is a fatal error.
//! * [`parse_split`] - a whole-text splitter which additionally strips `:` from ids,
//!   optionally normalizes case and reads `[key=value]` header attributes. Input
//!   without any record marker is rejected as "not a FASTA file".
//!
//! ## Usage
//!
//! ```rust
//! use seqmap::fasta::{encode_fasta, parse_strict, DEFAULT_LINE_WIDTH};
//!
//! let records = parse_strict(">chr1 test\nACGT\nACGT\n").unwrap();
//! assert_eq!(records["chr1"].sequence, "ACGTACGT");
//!
//! let text = encode_fasta(
//!     records.iter().map(|(id, r)| (id.as_str(), r.sequence.as_str())),
//!     DEFAULT_LINE_WIDTH,
//! )
//! .unwrap();
//! assert_eq!(text, ">chr1\nACGTACGT\n");
//! ```

mod parser;
mod reader;
mod split;
mod writer;

pub use parser::{parse_strict, parse_strict_with, FastaCollection};
pub use reader::{read_genome, read_split, read_strict, read_to_string};
pub use split::{parse_split, Case, SplitOptions};
pub use writer::{encode_fasta, FastaWriter, FastaWriterBuilder, DEFAULT_LINE_WIDTH};
