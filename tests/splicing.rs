mod common;

use std::rc::Rc;

use common::{
    data_path,
    load,
};
use gffkit::exports::bio::alphabets::dna;
use gffkit::prelude::*;
use rstest::{
    fixture,
    rstest,
};

#[fixture]
fn features() -> Vec<GffObj> {
    let registry: Rc<NameRegistry> = NameRegistry::new();
    load(&registry, "annotation.gff3", GffReaderConfig::default()).unwrap()
}

#[fixture]
fn genome() -> InMemoryProvider { InMemoryProvider::from_path(data_path("genome.fa")).unwrap() }

fn by_id<'a>(
    features: &'a [GffObj],
    id: &str,
) -> &'a GffObj {
    features
        .iter()
        .find(|obj| obj.id() == id)
        .unwrap()
}

fn naive_concat(
    genome: &mut InMemoryProvider,
    contig: &str,
    pieces: &[(u32, u32)],
) -> Vec<u8> {
    pieces
        .iter()
        .flat_map(|&(start, end)| genome.subseq(contig, start, end - start + 1).unwrap())
        .collect()
}

#[rstest]
fn indexed_and_in_memory_agree(
    features: Vec<GffObj>,
    mut genome: InMemoryProvider,
) -> anyhow::Result<()> {
    let mut indexed = IndexedFastaProvider::from_path(data_path("genome.fa"), None)?;
    for obj in features.iter().filter(|obj| obj.exon_count() > 0) {
        let a = obj.spliced(Some(&mut genome), false)?;
        let b = obj.spliced(Some(&mut indexed), false)?;
        assert_eq!(a, b, "{}", obj.id());
    }
    Ok(())
}

#[rstest]
fn reverse_strand_is_reverse_complement(
    features: Vec<GffObj>,
    mut genome: InMemoryProvider,
) -> anyhow::Result<()> {
    let tx3 = by_id(&features, "tx3");
    let spliced = tx3.spliced(Some(&mut genome), false)?.unwrap();
    let plus = naive_concat(&mut genome, "chr2", &[(5, 20), (40, 60)]);
    assert_eq!(spliced.seq, dna::revcomp(&plus));
    assert_eq!(spliced.segments, vec![(1, 21), (22, 37)]);
    Ok(())
}

#[rstest]
#[case::forward("tx1", 43)]
#[case::reverse("tx3", 27)]
fn cds_slices_agree(
    features: Vec<GffObj>,
    mut genome: InMemoryProvider,
    #[case] id: &str,
    #[case] cds_len: usize,
) -> anyhow::Result<()> {
    let obj = by_id(&features, id);
    let full = obj.spliced(Some(&mut genome), false)?.unwrap();
    let cds = obj.spliced(Some(&mut genome), true)?.unwrap();
    assert_eq!(cds.seq.len(), cds_len);
    assert_eq!((full.cds_start, full.cds_end), obj.mrna_cds_coords());
    assert_eq!(
        &full.seq[full.cds_start as usize - 1..full.cds_end as usize],
        cds.seq.as_slice()
    );

    let protein = obj.spliced_translation(Some(&mut genome), true)?.unwrap();
    assert_eq!(protein.len(), cds_len / 3);
    assert_eq!(protein, translate(&cds.seq));
    Ok(())
}

#[rstest]
fn transcript_without_cds(
    features: Vec<GffObj>,
    mut genome: InMemoryProvider,
) -> anyhow::Result<()> {
    let tx2 = by_id(&features, "tx2");
    assert_eq!(tx2.mrna_cds_coords(), (0, 0));
    assert!(tx2.spliced(Some(&mut genome), true)?.is_none());
    let spliced = tx2.spliced(Some(&mut genome), false)?.unwrap();
    assert_eq!(spliced.seq.len(), tx2.covlen() as usize);
    assert_eq!((spliced.cds_start, spliced.cds_end), (0, 0));
    Ok(())
}
