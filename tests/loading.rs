mod common;

use std::rc::Rc;

use assert_approx_eq::assert_approx_eq;
use common::{
    data_path,
    geometry,
    load,
    Geometry,
};
use gffkit::prelude::*;
use rstest::{
    fixture,
    rstest,
};

#[fixture]
fn registry() -> Rc<NameRegistry> { NameRegistry::new() }

#[rstest]
#[case::gff3("annotation.gff3")]
#[case::gtf("annotation.gtf")]
fn streaming_and_bulk_agree(
    registry: Rc<NameRegistry>,
    #[case] name: &str,
) -> anyhow::Result<()> {
    let bulk = load(&registry, name, GffReaderConfig::default())?;
    let streaming = load(
        &registry,
        name,
        GffReaderConfig::default().with_mode(ReadMode::Streaming),
    )?;
    assert_eq!(geometry(&bulk), geometry(&streaming));
    assert!(!geometry(&bulk).is_empty());
    Ok(())
}

#[rstest]
fn gff3_models(registry: Rc<NameRegistry>) -> anyhow::Result<()> {
    let features = load(&registry, "annotation.gff3", GffReaderConfig::default())?;
    let ids: Vec<&str> = features.iter().map(GffObj::id).collect();
    assert_eq!(ids, vec!["gene1", "tx1", "tx2", "tx3"]);

    let tx1 = &features[1];
    assert!(tx1.is_transcript());
    assert_eq!(tx1.display_name(), "ALPHA-201");
    assert_approx_eq!(tx1.score(), 12.5);
    assert_eq!(tx1.get_attr("tag"), Some("basic"));
    assert_eq!(tx1.covlen(), 21 + 21 + 11);
    assert_eq!((tx1.cds_start(), tx1.cds_end(), tx1.cds_phase()), (15, 95, '0'));
    let segs: Vec<_> = tx1
        .cds_segments()
        .iter()
        .map(|s| (s.start, s.end, s.phase))
        .collect();
    assert_eq!(segs, vec![(15, 30, '0'), (50, 70, '2'), (90, 95, '2')]);
    assert!(!tx1.has_errors());

    // 5-base intron between the two exons
    assert!(features[2].has_errors());

    let tx3 = &features[3];
    assert_eq!(tx3.strand(), Strand::Reverse);
    assert_approx_eq!(tx3.score(), 3.0);
    assert_eq!((tx3.cds_start(), tx3.cds_end(), tx3.cds_phase()), (10, 55, '0'));
    assert_eq!(tx3.seqname()?.as_str(), "chr2");
    Ok(())
}

#[rstest]
fn gtf_models(registry: Rc<NameRegistry>) -> anyhow::Result<()> {
    let features = load(&registry, "annotation.gtf", GffReaderConfig::default())?;
    assert_eq!(features.len(), 2);
    let tx1 = &features[0];
    assert_eq!(tx1.id(), "tx1");
    assert_eq!(tx1.gene_name(), Some("ALPHA"));
    assert_eq!(tx1.get_attr("exon_number"), Some("\"1\""));
    assert!(tx1.exons().iter().all(|exon| exon.attrs.is_empty()));

    let gff3 = load(&registry, "annotation.gff3", GffReaderConfig::default())?;
    let from_gff3: Vec<Geometry> = geometry(&gff3)
        .into_iter()
        .filter(|g| g.id != "tx2")
        .collect();
    assert_eq!(geometry(&features), from_gff3);
    Ok(())
}

#[rstest]
fn exon_attributes_kept_on_request(registry: Rc<NameRegistry>) -> anyhow::Result<()> {
    let config = GffReaderConfig::default().with_no_exon_attrs(false);
    let features = load(&registry, "annotation.gtf", config)?;
    let tx1 = &features[0];
    let names = tx1.names();
    let exon_numbers: Vec<String> = tx1
        .exons()
        .iter()
        .map(|exon| {
            let attr = &exon.attrs[0];
            assert_eq!(names.attr(attr.attr_id).unwrap().as_str(), "exon_number");
            attr.value.clone()
        })
        .collect();
    assert_eq!(exon_numbers, vec!["\"1\"", "\"2\"", "\"3\""]);
    Ok(())
}

#[rstest]
#[case::bulk(ReadMode::Bulk)]
#[case::streaming(ReadMode::Streaming)]
fn close_exons_merged(
    registry: Rc<NameRegistry>,
    #[case] mode: ReadMode,
) -> anyhow::Result<()> {
    let config = GffReaderConfig::default()
        .with_mode(mode)
        .with_merge_close_exons(true);
    let features = load(&registry, "annotation.gff3", config)?;
    let tx2 = features
        .iter()
        .find(|obj| obj.id() == "tx2")
        .expect("tx2 is loaded");
    assert_eq!(Geometry::from(tx2).exons, vec![(10, 70)]);
    assert_eq!(tx2.covlen(), 61);
    assert!(!tx2.has_errors());
    Ok(())
}

#[rstest]
fn contig_statistics(registry: Rc<NameRegistry>) -> anyhow::Result<()> {
    let mut reader = GffReader::from_path(
        data_path("annotation.gff3"),
        &registry,
        GffReaderConfig::default(),
    )?;
    reader.read_all()?;
    let stats: Vec<_> = reader
        .seq_stats()
        .sorted()
        .into_iter()
        .map(|s| (s.name.to_string(), s.mincoord, s.maxcoord, s.fcount))
        .collect();
    assert_eq!(stats, vec![
        ("chr1".to_string(), 10, 100, 3),
        ("chr2".to_string(), 5, 60, 1),
    ]);
    Ok(())
}

#[rstest]
fn duplicate_top_level_id_aborts(registry: Rc<NameRegistry>) {
    let text = "\
chr1\tdemo\tmRNA\t10\t100\t.\t+\t.\tID=tx1
chr1\tdemo\texon\t10\t100\t.\t+\t.\tParent=tx1
chr1\tdemo\tmRNA\t300\t400\t.\t+\t.\tID=tx1
";
    let mut reader = GffReader::new(text.as_bytes(), &registry, GffReaderConfig::default());
    let err = reader.load().unwrap_err();
    assert!(matches!(err, GffError::DuplicateId { .. }));
    assert_eq!(err.line(), Some("chr1\tdemo\tmRNA\t300\t400\t.\t+\t.\tID=tx1"));
}

#[rstest]
fn registry_released_after_features_drop(registry: Rc<NameRegistry>) -> anyhow::Result<()> {
    let features = load(&registry, "annotation.gff3", GffReaderConfig::default())?;
    assert_eq!(registry.ref_count(), features.len());
    assert_eq!(registry.seq(0)?.as_str(), "chr1");
    drop(features);
    assert_eq!(registry.ref_count(), 0);
    assert!(registry.seq(0).is_err());
    Ok(())
}
