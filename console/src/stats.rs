use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use console::style;
use gffkit::prelude::*;
use itertools::Itertools;
use serde::Serialize;

use crate::utils::{
    open_output,
    AnnotationArgs,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct StatsArgs {
    #[clap(flatten)]
    annotation: AnnotationArgs,

    #[arg(
        short = 'o',
        long,
        help = "Path for the per-contig table. Defaults to stdout."
    )]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ContigRow {
    contig:   String,
    start:    u32,
    end:      u32,
    features: usize,
    exons:    usize,
    with_cds: usize,
}

impl StatsArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let registry = NameRegistry::new();
        let (features, seq_stats) = self.annotation.load(&registry, utils)?;

        let by_contig = features.iter().into_group_map_by(|obj| obj.seq_id());

        let mut writer = csv::WriterBuilder::default()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(open_output(self.output.as_deref())?);
        for stat in seq_stats.sorted() {
            let members = by_contig
                .get(&stat.seq_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            writer.serialize(ContigRow {
                contig:   stat.name.to_string(),
                start:    stat.mincoord,
                end:      stat.maxcoord,
                features: stat.fcount,
                exons:    members.iter().map(|obj| obj.exon_count()).sum(),
                with_cds: members.iter().filter(|obj| obj.has_cds()).count(),
            })?;
        }
        writer.flush()?;

        let transcripts = features.iter().filter(|obj| obj.is_transcript()).count();
        let with_errors = features.iter().filter(|obj| obj.has_errors()).count();
        eprintln!(
            "{} features on {} contigs, {} transcripts",
            style(features.len()).green(),
            style(seq_stats.len()).green(),
            style(transcripts).green(),
        );
        if with_errors > 0 {
            eprintln!(
                "{} features have overlapping or duplicate exons",
                style(with_errors).red()
            );
        }
        Ok(())
    }
}
