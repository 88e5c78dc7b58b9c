//! Genomic subsequence providers used by the splicing engine.

use std::fs::File;
use std::io::{
    BufReader,
    Read,
};
use std::path::Path;

use anyhow::{
    anyhow,
    bail,
    Context,
};
use bio::io::fasta::Reader as BioFastaReader;
use hashbrown::HashMap;
use log::debug;
use noodles::core::{
    Position,
    Region,
};
use noodles::fasta::fai::io::Reader as FaiReader;
use noodles::fasta::fs::index as index_fasta;
use noodles::fasta::io::indexed_reader::{
    Builder as FastaBuilder,
    IndexedReader as FastaIndexedReader,
};

/// Source of raw genomic bases.
pub trait SeqProvider {
    /// Returns `len` bases of `contig` starting at the 1-based `start`.
    fn subseq(
        &mut self,
        contig: &str,
        start: u32,
        len: u32,
    ) -> anyhow::Result<Vec<u8>>;
}

/// Whole contig sequences kept in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    seqs: HashMap<String, Vec<u8>>,
}

impl InMemoryProvider {
    pub fn new() -> Self { Self::default() }

    pub fn insert(
        &mut self,
        contig: impl Into<String>,
        seq: impl Into<Vec<u8>>,
    ) {
        self.seqs.insert(contig.into(), seq.into());
    }

    /// Reads every record of a FASTA stream.
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut provider = Self::new();
        for record in BioFastaReader::new(reader).records() {
            let record = record.context("Malformed FASTA record")?;
            debug!("Loaded contig {} ({} bp)", record.id(), record.seq().len());
            provider.insert(record.id(), record.seq());
        }
        Ok(provider)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Could not open FASTA {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn contig_len(
        &self,
        contig: &str,
    ) -> Option<usize> {
        self.seqs.get(contig).map(Vec::len)
    }
}

impl SeqProvider for InMemoryProvider {
    fn subseq(
        &mut self,
        contig: &str,
        start: u32,
        len: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let seq = self
            .seqs
            .get(contig)
            .ok_or_else(|| anyhow!("Contig {} not found", contig))?;
        if start == 0 {
            bail!("Subsequence start must be 1-based");
        }
        let from = start as usize - 1;
        let to = from + len as usize;
        if to > seq.len() {
            bail!(
                "Range {}..{} is out of bounds for {} ({} bp)",
                start,
                to,
                contig,
                seq.len()
            );
        }
        Ok(seq[from..to].to_vec())
    }
}

/// FASTA file with a `.fai` index; regions are read on demand.
pub struct IndexedFastaProvider {
    reader: FastaIndexedReader<BufReader<File>>,
}

impl IndexedFastaProvider {
    /// Opens `path`. Without `index_path` the index is built by scanning
    /// the FASTA file.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        index_path: Option<P>,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let index = match index_path {
            Some(index_path) => FaiReader::new(BufReader::new(File::open(index_path)?))
                .read_index()
                .context("Could not read FASTA index")?,
            None => {
                debug!("Indexing {}", path.display());
                index_fasta(path)?
            },
        };
        let handle = BufReader::new(
            File::open(path).with_context(|| format!("Could not open FASTA {}", path.display()))?,
        );
        let reader = FastaBuilder::default()
            .set_index(index)
            .build_from_reader(handle)?;
        Ok(Self { reader })
    }
}

impl SeqProvider for IndexedFastaProvider {
    fn subseq(
        &mut self,
        contig: &str,
        start: u32,
        len: u32,
    ) -> anyhow::Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let from = Position::try_from(start as usize)?;
        let to = Position::try_from((start + len - 1) as usize)?;
        let region = Region::new(contig, from..=to);
        let record = self
            .reader
            .query(&region)
            .with_context(|| format!("Could not query {}", region))?;
        let bases = record.sequence().as_ref().to_vec();
        if bases.len() != len as usize {
            bail!("Region {} is out of bounds", region);
        }
        Ok(bases)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FASTA: &[u8] = b">chr1 test\nACGTACGTAC\nGTTT\n>chr2\nNNNN\n";

    #[test]
    fn in_memory_subseq() {
        let mut provider = InMemoryProvider::from_reader(FASTA).unwrap();
        assert_eq!(provider.contig_len("chr1"), Some(14));
        assert_eq!(provider.subseq("chr1", 9, 4).unwrap(), b"ACGT".to_vec());
        assert!(provider.subseq("chr1", 12, 4).is_err());
        assert!(provider.subseq("chr3", 1, 1).is_err());
    }

    #[test]
    fn indexed_subseq_matches_in_memory() {
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        file.write_all(FASTA).unwrap();
        file.flush().unwrap();

        let mut indexed = IndexedFastaProvider::from_path(file.path(), None).unwrap();
        let mut in_memory = InMemoryProvider::from_path(file.path()).unwrap();
        assert_eq!(
            indexed.subseq("chr1", 8, 5).unwrap(),
            in_memory.subseq("chr1", 8, 5).unwrap()
        );
        assert_eq!(indexed.subseq("chr2", 2, 2).unwrap(), b"NN".to_vec());
    }
}
