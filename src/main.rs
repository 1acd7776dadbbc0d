use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use seqmap::extract::{extract_batch, select_representative, ExtractOptions};
use seqmap::fasta::{
    read_genome, read_split, read_strict, read_to_string, FastaWriter, SplitOptions,
};
use seqmap::gff::{parse_gff3, FeatureStore};
use seqmap::{fai, ops, FastaCollection, FastaWriterBuilder};

#[derive(Parser)]
#[command(name = "seqmap")]
#[command(about = "FASTA/GFF3 utilities: gene extraction, selection and splitting", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "2", global = true)]
    verbosity: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the total number of bases of each FASTA (or .fai) file
    Sum {
        #[arg(value_name = "FASTA", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Extract annotated genes from a genome
    ByGff {
        /// Reference genome
        #[arg(long, value_name = "FASTA")]
        fasta: PathBuf,

        /// GFF3 annotation
        #[arg(long, value_name = "GFF3")]
        gff: PathBuf,

        /// Gene ids: a list file, '-' for stdin, or comma-separated ids
        /// (default: every feature of the selected type)
        #[arg(short = 'l', long, value_name = "LIST")]
        list: Option<String>,

        /// Feature type to select
        #[arg(short = 'f', long, value_name = "TYPE", default_value = "gene")]
        feature: String,

        /// Reverse complement features on the minus strand
        #[arg(long)]
        auto_rc: bool,

        /// Bases added upstream of each feature
        #[arg(long, value_name = "INT", default_value = "0")]
        upstream: u64,

        /// Bases added downstream of each feature
        #[arg(long, value_name = "INT", default_value = "0")]
        downstream: u64,

        /// Number of threads (0 uses every core)
        #[arg(short = 't', long, value_name = "INT", default_value = "0")]
        threads: usize,

        /// Output FASTA file (default: stdout)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Bases per output line
        #[arg(short = 'w', long, value_name = "INT", default_value = "50")]
        line_width: usize,
    },

    /// Keep the records named in a list, in list order
    ByList {
        #[arg(value_name = "FASTA")]
        fasta: PathBuf,

        /// Id list ('-' for stdin); only the first tab-separated column is used
        #[arg(value_name = "LIST")]
        list: String,

        /// Output FASTA file ('-' or absent for stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Drop the records named in a list
    Exclude {
        #[arg(value_name = "FASTA")]
        fasta: PathBuf,

        #[arg(value_name = "LIST")]
        list: String,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Split a FASTA file into numbered chunks
    Split {
        #[arg(value_name = "FASTA")]
        fasta: PathBuf,

        /// Records per chunk
        #[arg(long, value_name = "INT", conflicts_with = "parts", required_unless_present = "parts")]
        chunk_size: Option<usize>,

        /// Approximate number of chunks
        #[arg(long, value_name = "INT")]
        parts: Option<usize>,

        /// Directory receiving the chunks
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();

    match cli.command {
        Commands::Sum { inputs } => sum(&inputs),
        Commands::ByGff {
            fasta,
            gff,
            list,
            feature,
            auto_rc,
            upstream,
            downstream,
            threads,
            output,
            line_width,
        } => {
            let mut builder = ExtractOptions::builder()
                .feature_type(&feature)
                .auto_reverse_complement(auto_rc);
            if upstream > 0 || downstream > 0 {
                builder = builder.flanks(upstream, downstream);
            }
            let writer = FastaWriterBuilder::default()
                .line_width(line_width)
                .build(open_output(output.as_deref())?);
            by_gff(
                &fasta,
                &gff,
                list.as_deref(),
                &builder.build(),
                threads,
                writer,
            )
        }
        Commands::ByList {
            fasta,
            list,
            output,
        } => {
            let genome = read_split(&fasta, &SplitOptions::default())?;
            let ids = read_id_list(&list)?;
            let selected = ops::select_by_ids(&genome, &ids);
            log::info!("selected {} of {} ids", selected.len(), ids.len());
            write_by_header(&selected, FastaWriter::new(open_output(output.as_deref())?))
        }
        Commands::Exclude {
            fasta,
            list,
            output,
        } => {
            let genome = read_split(&fasta, &SplitOptions::default())?;
            let ids = read_id_list(&list)?;
            let kept = ops::exclude_by_ids(&genome, &ids);
            log::info!("kept {} of {} records", kept.len(), genome.len());
            write_by_header(&kept, FastaWriter::new(open_output(Some(&output))?))
        }
        Commands::Split {
            fasta,
            chunk_size,
            parts,
            out_dir,
        } => split(&fasta, chunk_size, parts, &out_dir),
    }
}

fn sum(inputs: &[PathBuf]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in inputs {
        let total = if path.extension().is_some_and(|ext| ext == "fai") {
            fai::indexed_length(&fai::read_fai(path)?)
        } else {
            ops::total_length(&read_strict(path)?)
        };
        writeln!(out, "{} {total}", path.display())?;
    }
    Ok(())
}

fn by_gff<W: Write>(
    fasta: &Path,
    gff: &Path,
    list: Option<&str>,
    options: &ExtractOptions,
    threads: usize,
    mut writer: FastaWriter<W>,
) -> Result<()> {
    let genome = read_genome(fasta)?;
    let features = parse_gff3(&read_to_string(gff)?)?;
    log::info!(
        "loaded {} sequences and {} features",
        genome.len(),
        features.len()
    );

    let gene_ids = match list {
        Some(list) => read_id_list(list)?,
        None => features
            .features()
            .iter()
            .filter(|f| f.feature_type == options.feature_type())
            .filter_map(|f| f.id().map(str::to_string))
            .collect(),
    };

    let batch = extract_batch(&gene_ids, &genome, &features, options, threads);
    let mut failed = 0;
    for (gene_id, result) in gene_ids.iter().zip(batch) {
        let Ok(found) = result else {
            failed += 1; // already reported by the batch
            continue;
        };
        match select_representative(&found) {
            Ok(Some(best)) => {
                writer.write_record(&best.header, &best.sequence)?;
            }
            Ok(None) => log::warn!("{gene_id}: no {} feature found", options.feature_type()),
            Err(e) => {
                failed += 1;
                log::warn!("{gene_id}: {e}");
            }
        }
    }
    writer.flush()?;
    log::info!(
        "wrote {} sequences, {failed} gene ids failed",
        writer.records_written()
    );
    Ok(())
}

fn split(fasta: &Path, chunk_size: Option<usize>, parts: Option<usize>, out_dir: &Path) -> Result<()> {
    let options = SplitOptions::default().key_by_header(true);
    let collection = read_split(fasta, &options)?;
    let per_chunk = match (chunk_size, parts) {
        (Some(n), _) => n,
        (None, Some(parts)) => ops::chunk_size_for_parts(collection.len(), parts),
        (None, None) => bail!("either --chunk-size or --parts is required"),
    };
    if per_chunk == 0 {
        bail!("chunk size must be positive");
    }

    let stem = fasta
        .file_stem()
        .map_or_else(|| "chunk".into(), |s| s.to_string_lossy());
    let chunks = ops::split_chunks(&collection, per_chunk);
    for (idx, chunk) in chunks.iter().enumerate() {
        let label = ops::chunk_label(idx + 1, chunks.len());
        let path = out_dir.join(format!("{stem}.{label}.fa"));
        let mut writer = FastaWriter::new(BufWriter::new(File::create(&path)?));
        writer.write_all(chunk.iter().map(|(key, r)| (key, &r.sequence)))?;
        writer.flush()?;
        log::info!("{}: {} records", path.display(), chunk.len());
    }
    Ok(())
}

/// Writes records keyed by their full header
fn write_by_header<W: Write>(collection: &FastaCollection, mut writer: FastaWriter<W>) -> Result<()> {
    writer.write_all(collection.values().map(|r| (&r.header, &r.sequence)))?;
    writer.flush()?;
    Ok(())
}

/// Reads gene or sequence ids from a file, stdin (`-`) or a comma-separated value
fn read_id_list(source: &str) -> Result<Vec<String>> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(ops::parse_id_list(&text));
    }
    let path = Path::new(source);
    if path.is_file() {
        return Ok(ops::parse_id_list(&std::fs::read_to_string(path)?));
    }
    Ok(source
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) if path != Path::new("-") => {
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}
