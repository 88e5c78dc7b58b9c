use std::rc::Rc;

use bio::alphabets::dna;
use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::data_structs::{
    NameRegistry,
    NamesRef,
    Segment,
};
use crate::io::fasta::InMemoryProvider;

const GENOME: &[u8] = b"CCATGGCCAATTAGCGTTGACCTTAAGGCATCG";

#[fixture]
fn names() -> NamesRef {
    let registry: Rc<NameRegistry> = NameRegistry::new();
    registry.acquire()
}

#[fixture]
fn provider() -> InMemoryProvider {
    let mut provider = InMemoryProvider::new();
    provider.insert("chr1", GENOME);
    provider
}

fn model(
    names: &NamesRef,
    strand: Strand,
    cds: Option<(u32, u32, char)>,
) -> GffObj {
    let mut obj = GffObj::new(names, "t1", "chr1", "test", "mRNA", strand, 1, 1);
    obj.add_exon(Segment::new(3, 8), false, false);
    obj.add_exon(Segment::new(13, 20), false, false);
    if let Some((start, end, phase)) = cds {
        obj.add_exon(Segment::new(start, end).with_phase(phase), true, false);
    }
    obj
}

fn genomic(
    start: u32,
    end: u32,
) -> &'static [u8] {
    &GENOME[start as usize - 1..end as usize]
}

#[rstest]
fn forward_concatenates_exons(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    let obj = model(&names, Strand::Forward, Some((5, 16, '0')));
    let spliced = obj.spliced(Some(&mut provider), false).unwrap().unwrap();
    assert_eq!(spliced.seq, [genomic(3, 8), genomic(13, 20)].concat());
    assert_eq!(spliced.segments, vec![(1, 6), (7, 14)]);
    assert_eq!((spliced.cds_start, spliced.cds_end), (3, 10));
    assert_eq!(obj.mrna_cds_coords(), (3, 10));
}

#[rstest]
fn reverse_is_reverse_complement(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    let forward = model(&names, Strand::Forward, None);
    let reverse = model(&names, Strand::Reverse, None);
    let plus = forward.spliced(Some(&mut provider), false).unwrap().unwrap();
    let minus = reverse.spliced(Some(&mut provider), false).unwrap().unwrap();
    assert_eq!(minus.seq, dna::revcomp(&plus.seq));
    assert_eq!(minus.segments, vec![(1, 8), (9, 14)]);
}

#[rstest]
fn reverse_cds_coords(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    let obj = model(&names, Strand::Reverse, Some((5, 16, '0')));
    let spliced = obj.spliced(Some(&mut provider), false).unwrap().unwrap();
    assert_eq!((spliced.cds_start, spliced.cds_end), (5, 12));
    assert_eq!(obj.mrna_cds_coords(), (5, 12));
}

#[rstest]
#[case::phase0('0', [(5, 8), (13, 16)])]
#[case::phase1('1', [(6, 8), (13, 16)])]
fn cds_only_clips_to_cds(
    names: NamesRef,
    mut provider: InMemoryProvider,
    #[case] phase: char,
    #[case] pieces: [(u32, u32); 2],
) {
    let obj = model(&names, Strand::Forward, Some((5, 16, phase)));
    let spliced = obj.spliced(Some(&mut provider), true).unwrap().unwrap();
    let expected: Vec<u8> = pieces
        .iter()
        .flat_map(|&(s, e)| genomic(s, e).iter().copied())
        .collect();
    assert_eq!(spliced.seq, expected);
    assert_eq!((spliced.cds_start, spliced.cds_end), (0, 0));
}

#[rstest]
fn cds_slice_of_transcript_matches_cds_only(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    for strand in [Strand::Forward, Strand::Reverse] {
        let obj = model(&names, strand, Some((5, 16, '0')));
        let full = obj.spliced(Some(&mut provider), false).unwrap().unwrap();
        let cds = obj.spliced(Some(&mut provider), true).unwrap().unwrap();
        let slice = &full.seq[full.cds_start as usize - 1..full.cds_end as usize];
        assert_eq!(slice, cds.seq.as_slice(), "strand {}", strand);
    }
}

#[rstest]
#[case::three_n_plus_one((5, 15), 2)]
#[case::three_n_plus_two((5, 16), 2)]
#[case::three_n((5, 17), 3)]
fn translation_drops_partial_codons(
    names: NamesRef,
    mut provider: InMemoryProvider,
    #[case] cds: (u32, u32),
    #[case] expected_len: usize,
) {
    let obj = model(&names, Strand::Forward, Some((cds.0, cds.1, '0')));
    let spliced = obj.spliced(Some(&mut provider), true).unwrap().unwrap();
    let protein = obj
        .spliced_translation(Some(&mut provider), true)
        .unwrap()
        .unwrap();
    assert_eq!(protein.len(), expected_len);
    assert_eq!(protein.len(), spliced.seq.len() / 3);
    assert_eq!(protein, translate(&spliced.seq));
}

#[rstest]
fn empty_results(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    let no_cds = model(&names, Strand::Forward, None);
    assert_eq!(no_cds.spliced(Some(&mut provider), true).unwrap(), None);
    assert_eq!(no_cds.mrna_cds_coords(), (0, 0));
    assert_eq!(no_cds.spliced(None, false).unwrap(), None);

    let empty = GffObj::new(&names, "t2", "chr1", "test", "mRNA", Strand::Forward, 3, 8);
    assert_eq!(empty.spliced(Some(&mut provider), false).unwrap(), None);
    assert_eq!(empty.spliced_translation(Some(&mut provider), false).unwrap(), None);
}

#[rstest]
fn provider_failure_is_an_error(names: NamesRef) {
    let mut provider = InMemoryProvider::new();
    provider.insert("chr1", &GENOME[..10]);
    let obj = model(&names, Strand::Forward, None);
    let err = obj.spliced(Some(&mut provider), false).unwrap_err();
    assert!(matches!(err, GffError::Subsequence { start: 3, end: 20, .. }));
}

/// Hands back only the first half of every requested window.
struct TruncatingProvider(InMemoryProvider);

impl SeqProvider for TruncatingProvider {
    fn subseq(
        &mut self,
        contig: &str,
        start: u32,
        len: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let mut seq = self.0.subseq(contig, start, len)?;
        seq.truncate(len as usize / 2);
        Ok(seq)
    }
}

#[rstest]
#[case::forward(Strand::Forward)]
#[case::reverse(Strand::Reverse)]
fn short_window_is_an_error(
    names: NamesRef,
    provider: InMemoryProvider,
    #[case] strand: Strand,
) {
    let mut short = TruncatingProvider(provider);
    let obj = model(&names, strand, Some((5, 16, '0')));
    let err = obj.spliced(Some(&mut short), false).unwrap_err();
    assert!(matches!(err, GffError::Subsequence { start: 3, end: 20, .. }));
    assert!(obj.spliced_translation(Some(&mut short), true).is_err());
}

#[rstest]
fn phase_covering_whole_cds(
    names: NamesRef,
    mut provider: InMemoryProvider,
) {
    let obj = model(&names, Strand::Reverse, Some((3, 3, '2')));
    let spliced = obj.spliced(Some(&mut provider), true).unwrap().unwrap();
    assert_eq!(spliced.seq, vec![dna::complement(GENOME[2])]);
}
