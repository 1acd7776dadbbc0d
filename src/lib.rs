//! # seqmap
//!
//! Sequence plumbing for FASTA and GFF3 data: parsing FASTA text into records,
//! mapping coordinates between gapped alignment rows and their ungapped reference,
//! reverse complementing nucleotide sequences, and extracting annotated genes from a
//! reference genome with strand awareness.
//!
//! ## Modules
//!
//! * [`fasta`] - strict and whole-text FASTA parsers, file readers and a FASTA writer
//! * [`coords`] - alignment column to reference base maps, in both directions
//! * [`complement`] - audited and permissive reverse complements
//! * [`gff`] - GFF3 features and the [`FeatureStore`](gff::FeatureStore) trait
//! * [`genome`] - the [`GenomeSource`](genome::GenomeSource) lookup trait
//! * [`extract`] - gene extraction, isoform tie-breaking and parallel batches
//! * [`fai`] - `.fai` index files
//! * [`ops`] - selection, exclusion, joining and splitting of collections
//! * [`motif`] - poly-residue and S/T-Q cluster sweeps

pub mod complement;
pub mod coords;
mod error;
pub mod extract;
pub mod fai;
pub mod fasta;
pub mod genome;
pub mod gff;
pub mod motif;
pub mod ops;
mod record;

pub use error::{AmbiguityError, Error, FormatError, LookupError, ReadError, Result};
pub use fasta::{FastaCollection, FastaWriterBuilder};
pub use record::{AttributeMatcher, FastaAttributes, FastaRecord, Location, Topology};

#[cfg(test)]
mod testing {

    use super::*;
    use crate::extract::{extract_gene_sequences, select_representative, ExtractOptions};
    use crate::fasta::{encode_fasta, parse_split, parse_strict, SplitOptions};
    use crate::gff::parse_gff3;
    use anyhow::Result;

    #[test]
    fn test_canonical_reserialization_is_stable() -> Result<()> {
        let canonical = ">chr1\nACGTACGTAC\nGTACGTACGT\nAC\n>chr2\nTTTT\n";
        let records = parse_strict(canonical)?;
        let encoded = encode_fasta(
            records.iter().map(|(id, r)| (id.as_str(), r.sequence.as_str())),
            10,
        )?;
        assert_eq!(encoded, canonical);

        let again = parse_strict(&encoded)?;
        assert_eq!(again, records);
        Ok(())
    }

    #[test]
    fn test_parsers_disagree_on_empty_input() -> Result<()> {
        assert!(parse_strict("")?.is_empty());
        let err = parse_split("", &SplitOptions::default()).unwrap_err();
        assert!(matches!(err, Error::FormatError(FormatError::NotFasta)));
        Ok(())
    }

    #[test]
    fn test_gff_driven_extraction() -> Result<()> {
        let genome = parse_strict(">chr1\nATGCCC\nGGGTAA\n")?;
        let features = parse_gff3(
            "##gff-version 3\n\
             chr1\tsrc\tgene\t1\t12\t.\t-\t.\tID=g1;Name=demo\n\
             chr1\tsrc\tgene\t4\t9\t.\t-\t.\tID=g1b\n",
        )?;
        let options = ExtractOptions::builder().auto_reverse_complement(true).build();

        let results = extract_gene_sequences("g1", &genome, &features, &options)?;
        assert_eq!(results.len(), 2);
        let best = select_representative(&results)?.expect("two candidates");
        assert_eq!(best.sequence, "TTACCCGGGCAT");
        assert_eq!(
            best.header,
            "g1 demo g1:1-12:- [reverse] [complement] chr1_1_12"
        );
        Ok(())
    }
}
