use parking_lot::Mutex;

use super::{extract_gene_sequences, ExtractOptions, ExtractionResult};
use crate::error::Result;
use crate::genome::GenomeSource;
use crate::gff::FeatureStore;

/// Extracts many gene ids in parallel
///
/// Gene ids are split into contiguous ranges, one per thread. The genome and the
/// feature store are only read. Every gene id gets its own `Result` so that a failing
/// id never affects its siblings; results are returned in input order.
///
/// # Arguments
///
/// * `gene_ids` - Gene id prefixes to extract
/// * `genome` - Reference sequences keyed by `seqid`
/// * `features` - Annotated features to select from
/// * `options` - Feature type, strand handling and window
/// * `num_threads` - Number of worker threads (0 uses every available core)
pub fn extract_batch<S, G, F>(
    gene_ids: &[S],
    genome: &G,
    features: &F,
    options: &ExtractOptions,
    num_threads: usize,
) -> Vec<Result<Vec<ExtractionResult>>>
where
    S: AsRef<str> + Sync,
    G: GenomeSource + Sync + ?Sized,
    F: FeatureStore + Sync + ?Sized,
{
    // Calculate the number of threads to use
    let num_threads = if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads.min(num_cpus::get())
    };
    if gene_ids.is_empty() {
        return Vec::new();
    }
    let ids_per_thread = gene_ids.len().div_ceil(num_threads);
    log::info!(
        "extracting {} gene ids on {num_threads} threads",
        gene_ids.len()
    );

    let slots = Mutex::new(
        std::iter::repeat_with(|| None)
            .take(gene_ids.len())
            .collect::<Vec<Option<Result<Vec<ExtractionResult>>>>>(),
    );

    std::thread::scope(|scope| {
        for tid in 0..num_threads {
            let slots = &slots;
            scope.spawn(move || {
                let start_idx = tid * ids_per_thread;
                let end_idx = (start_idx + ids_per_thread).min(gene_ids.len());
                if start_idx >= end_idx {
                    return; // No gene ids for this thread
                }

                for (idx, gene_id) in gene_ids[start_idx..end_idx].iter().enumerate() {
                    let gene_id = gene_id.as_ref();
                    let result = extract_gene_sequences(gene_id, genome, features, options)
                        .inspect(|found| {
                            if found.is_empty() {
                                log::debug!("{gene_id}: no matching feature");
                            }
                        })
                        .inspect_err(|e| log::warn!("{gene_id}: {e}"));
                    slots.lock()[start_idx + idx] = Some(result);
                }
            });
        }
    });

    let results: Vec<_> = slots.into_inner().into_iter().flatten().collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    log::info!(
        "extracted {} gene ids ({failed} failed)",
        results.len() - failed
    );
    results
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::gff::{GeneFeature, Strand};
    use crate::Error;
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn fixture() -> (IndexMap<String, String>, Vec<GeneFeature>) {
        let mut genome = IndexMap::new();
        genome.insert("chr1".to_string(), "ACGTACGTACGTACGTACGT".to_string());
        let mut features = Vec::new();
        for i in 0..20u64 {
            let seqid = if i == 7 { "chrMissing" } else { "chr1" };
            features.push(
                GeneFeature::new(seqid, "gene", i + 1, 20, Strand::Forward)
                    .with_attribute("ID", &format!("gene{i:02}")),
            );
        }
        (genome, features)
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let (genome, features) = fixture();
        let ids: Vec<String> = (0..20).map(|i| format!("gene{i:02}")).collect();

        for threads in [1, 3, 0] {
            let results = extract_batch(&ids, &genome, &features, &ExtractOptions::default(), threads);
            assert_eq!(results.len(), ids.len());
            for (i, result) in results.iter().enumerate() {
                if i == 7 {
                    assert!(matches!(result, Err(Error::LookupError(_))));
                } else {
                    let found = result.as_ref().expect("extraction succeeds");
                    assert_eq!(found.len(), 1);
                    assert_eq!(found[0].gene_id, ids[i]);
                    assert_eq!(found[0].sequence.len(), 20 - i);
                }
            }
        }
    }

    #[test]
    fn test_batch_with_shared_inputs() {
        let (genome, features) = fixture();
        let genome = Arc::new(genome);
        let features = Arc::new(features);
        let results = extract_batch(
            &["gene01", "absent"],
            &genome,
            &features,
            &ExtractOptions::default(),
            2,
        );
        assert_eq!(results[0].as_ref().map(Vec::len).ok(), Some(1));
        assert_eq!(results[1].as_ref().map(Vec::len).ok(), Some(0));
    }

    #[test]
    fn test_empty_batch() {
        let (genome, features) = fixture();
        let ids: [&str; 0] = [];
        assert!(extract_batch(&ids, &genome, &features, &ExtractOptions::default(), 4).is_empty());
    }
}
