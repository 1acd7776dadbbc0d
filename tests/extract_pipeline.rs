use std::fs;

use anyhow::Result;
use seqmap::complement::complement_strict;
use seqmap::extract::{extract_batch, select_representative, ExtractOptions};
use seqmap::fasta::{read_strict, read_to_string, FastaWriter};
use seqmap::gff::{parse_gff3, FeatureStore};
use seqmap::{Error, LookupError};

const GENOME: &str = ">chrI description\n\
ATGAAACCCGGGTTTAAACCC\n\
GGGTTTAAACCCGGGTTTTAG\n\
>chrII\n\
CCCCAAAAGGGGTTTT\n";

const GFF: &str = "##gff-version 3\n\
chrI\tdemo\tgene\t1\t12\t.\t+\t.\tID=geneA;Name=alpha\n\
chrI\tdemo\tmRNA\t1\t12\t.\t+\t.\tID=geneA.t1;Parent=geneA\n\
chrI\tdemo\tgene\t22\t42\t.\t-\t.\tID=geneB.1\n\
chrI\tdemo\tgene\t25\t42\t.\t-\t.\tID=geneB.2\n\
chrII\tdemo\tgene\t5\t8\t.\t.\t.\tID=geneC.1\n\
chrII\tdemo\tgene\t9\t12\t.\t.\t.\tID=geneC.2\n\
chrIII\tdemo\tgene\t1\t5\t.\t+\t.\tID=geneD\n";

#[test]
fn extract_genes_from_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let fasta_path = dir.path().join("genome.fa");
    let gff_path = dir.path().join("genome.gff3");
    fs::write(&fasta_path, GENOME)?;
    fs::write(&gff_path, GFF)?;

    let genome = read_strict(&fasta_path)?;
    assert_eq!(genome["chrI"].header, "chrI description");
    assert_eq!(genome["chrI"].len(), 42);

    let features = parse_gff3(&read_to_string(&gff_path)?)?;
    assert_eq!(features.by_seqid("chrI").len(), 4);

    let options = ExtractOptions::builder().auto_reverse_complement(true).build();
    let ids = ["geneA", "geneB", "geneC", "geneD", "geneZ"];
    let batch = extract_batch(&ids, &genome, &features, &options, 2);
    assert_eq!(batch.len(), ids.len());

    let mut writer = FastaWriter::new(Vec::new());
    let mut outcomes = Vec::new();
    for (id, result) in ids.iter().zip(&batch) {
        match result {
            Ok(found) => match select_representative(found) {
                Ok(Some(best)) => {
                    writer.write_record(&best.header, &best.sequence)?;
                    outcomes.push(format!("{id}:ok"));
                }
                Ok(None) => outcomes.push(format!("{id}:none")),
                Err(Error::AmbiguityError(_)) => outcomes.push(format!("{id}:ambiguous")),
                Err(e) => return Err(e.into()),
            },
            Err(Error::LookupError(LookupError::MissingSequence { seqid, .. })) => {
                outcomes.push(format!("{id}:missing {seqid}"));
            }
            Err(e) => return Err(anyhow::anyhow!("{id}: {e}")),
        }
    }
    assert_eq!(
        outcomes,
        [
            "geneA:ok",
            "geneB:ok",
            "geneC:ambiguous",
            "geneD:missing chrIII",
            "geneZ:none",
        ]
    );

    let chr1 = &genome["chrI"].sequence;
    let expected = format!(
        ">geneA alpha geneA:1-12:+ chrI_1_12\n{}\n\
         >geneB.1 geneB:22-42:- [reverse] [complement] chrI_22_42\n{}\n",
        &chr1[..12],
        complement_strict(&chr1[21..42]),
    );
    assert_eq!(String::from_utf8(writer.into_inner())?, expected);
    Ok(())
}

#[test]
fn flanked_extraction_reports_relative_markers() -> Result<()> {
    let genome = seqmap::fasta::parse_strict(GENOME)?;
    let features = parse_gff3(GFF)?;
    let options = ExtractOptions::builder()
        .feature_type("mRNA")
        .flanks(0, 3)
        .build();

    let batch = extract_batch(&["geneA"], &genome, &features, &options, 1);
    let found = batch.into_iter().next().expect("one result")?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sequence, "ATGAAACCCGGGTTT");
    assert_eq!(
        found[0].header,
        "geneA.t1 geneA:1-12:+ chrI_1_15 [relative 5' 0]-[relative 3' 3]"
    );
    Ok(())
}
