//! File access for FASTA text
//!
//! Plain files are memory-mapped and validated as UTF-8; files ending in `.zst` are
//! streamed through a zstd decoder.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use super::{parse_split, parse_strict, Case, FastaCollection, SplitOptions};
use crate::error::{ReadError, Result};

/// Reads a whole FASTA file into memory
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be opened
/// * The path is not a regular file
/// * The contents are not valid UTF-8 (or not a valid zstd stream)
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    // Verify input file is a file before attempting to map
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(ReadError::IncompatibleFile(path.display().to_string()).into());
    }

    if path.extension().is_some_and(|ext| ext == "zst") {
        let mut decoder = zstd::Decoder::new(file)?;
        let mut text = String::new();
        decoder.read_to_string(&mut text)?;
        return Ok(text);
    }

    if metadata.len() == 0 {
        return Ok(String::new());
    }

    // Safety: the file is open and won't be modified while mapped
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap)?;
    Ok(text.to_owned())
}

/// Reads and parses a FASTA file with the strict state machine
pub fn read_strict<P: AsRef<Path>>(path: P) -> Result<FastaCollection> {
    let path = path.as_ref();
    let text = read_to_string(path)?;
    parse_strict(&text).inspect_err(|e| log::error!("{}: {e}", path.display()))
}

/// Reads and parses a FASTA file with the whole-text splitter
pub fn read_split<P: AsRef<Path>>(path: P, options: &SplitOptions) -> Result<FastaCollection> {
    let path = path.as_ref();
    let text = read_to_string(path)?;
    parse_split(&text, options).inspect_err(|e| log::error!("{}: {e}", path.display()))
}

/// Reads a reference genome for feature extraction
///
/// Uses the whole-text splitter keyed by id, so `:` is removed from sequence ids,
/// and upper-cases every sequence.
pub fn read_genome<P: AsRef<Path>>(path: P) -> Result<FastaCollection> {
    read_split(path, &SplitOptions::default().case(Case::Upper))
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::Error;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_plain_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, ">chr1\nACGT\nTTGG\n>chr2 [top=circular]\nCC\n")?;
        file.flush()?;

        let strict = read_strict(file.path())?;
        assert_eq!(strict["chr1"].sequence, "ACGTTTGG");

        let split = read_split(file.path(), &SplitOptions::default())?;
        assert!(split["chr2"].attributes.is_some());
        Ok(())
    }

    #[test]
    fn test_read_genome_normalizes_ids_and_case() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, ">chrI: primary\nacgtNN\n>chr:II\nggTT\n")?;
        file.flush()?;

        let genome = read_genome(file.path())?;
        assert_eq!(genome["chrI"].sequence, "ACGTNN");
        assert_eq!(genome["chrII"].sequence, "GGTT");
        assert_eq!(genome["chrII"].header, "chr:II");
        Ok(())
    }

    #[test]
    fn test_read_empty_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        assert!(read_strict(file.path())?.is_empty());
        assert!(read_split(file.path(), &SplitOptions::default()).is_err());
        Ok(())
    }

    #[test]
    fn test_read_zstd_file() -> Result<()> {
        let file = tempfile::Builder::new().suffix(".fa.zst").tempfile()?;
        let compressed = zstd::encode_all(&b">z1\nAAAACCCC\n"[..], 3)?;
        std::fs::write(file.path(), compressed)?;

        let records = read_strict(file.path())?;
        assert_eq!(records["z1"].sequence, "AAAACCCC");
        Ok(())
    }

    #[test]
    fn test_directory_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        match read_to_string(dir.path()) {
            Err(Error::ReadError(ReadError::IncompatibleFile(_)) | Error::IoError(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
