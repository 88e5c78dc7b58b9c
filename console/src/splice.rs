use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use console::style;
use gffkit::exports::bio::io::fasta;
use gffkit::prelude::*;
use log::{
    debug,
    info,
    warn,
};

use crate::utils::{
    open_output,
    validate_input,
    AnnotationArgs,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct SpliceArgs {
    #[clap(flatten)]
    annotation: AnnotationArgs,

    #[arg(long, required = true, help = "Genome FASTA the annotation refers to.")]
    fasta: PathBuf,

    #[arg(long, help = "FASTA index (.fai). Built on the fly when missing.")]
    index: Option<PathBuf>,

    #[arg(long, help = "Load the whole genome into memory instead of using the index.")]
    in_memory: bool,

    #[arg(long, help = "Only splice the coding segments.")]
    cds: bool,

    #[arg(long, help = "Write the translated protein. Implies --cds.")]
    protein: bool,

    #[arg(
        short = 'o',
        long,
        help = "Path for the generated FASTA file. Defaults to stdout."
    )]
    output: Option<PathBuf>,
}

impl SpliceArgs {
    fn provider(&self) -> anyhow::Result<Box<dyn SeqProvider>> {
        validate_input(&self.fasta)?;
        if self.in_memory {
            Ok(Box::new(InMemoryProvider::from_path(&self.fasta)?))
        }
        else {
            Ok(Box::new(IndexedFastaProvider::from_path(
                &self.fasta,
                self.index.as_ref(),
            )?))
        }
    }

    fn description(
        obj: &GffObj,
        spliced: Option<&SplicedSeq>,
    ) -> anyhow::Result<String> {
        let mut desc = format!(
            "{}:{}-{}{}",
            obj.seqname()?,
            obj.start(),
            obj.end(),
            obj.strand()
        );
        if let Some(name) = obj.gene_name() {
            desc.push_str(&format!(" gene={}", name));
        }
        if let Some(spliced) = spliced {
            if spliced.cds_start > 0 {
                desc.push_str(&format!(" CDS={}-{}", spliced.cds_start, spliced.cds_end));
            }
        }
        Ok(desc)
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let registry = NameRegistry::new();
        let (features, _) = self.annotation.load(&registry, utils)?;
        let mut provider = self.provider()?;
        let cds_only = self.cds || self.protein;

        let mut writer = fasta::Writer::new(open_output(self.output.as_deref())?);
        let mut written = 0usize;
        let mut failed = 0usize;
        for obj in features.iter().filter(|obj| obj.exon_count() > 0) {
            let spliced = match obj.spliced(Some(provider.as_mut()), cds_only) {
                Ok(Some(spliced)) => spliced,
                Ok(None) => {
                    debug!("Nothing to splice for {}", obj.id());
                    continue;
                },
                Err(err) => {
                    warn!("Skipping {}: {}", obj.id(), err);
                    failed += 1;
                    continue;
                },
            };

            if self.protein {
                let protein = translate(&spliced.seq);
                writer.write(obj.id(), Some(&Self::description(obj, None)?), &protein)?;
            }
            else {
                let desc = Self::description(obj, Some(&spliced))?;
                writer.write(obj.id(), Some(&desc), &spliced.seq)?;
            }
            written += 1;
        }
        writer.flush()?;

        if failed > 0 {
            eprintln!(
                "{} features could not be spliced",
                style(failed).red()
            );
        }
        info!("Wrote {} sequences", written);
        Ok(())
    }
}
