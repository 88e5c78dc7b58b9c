use std::io::Write;
use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use gffkit::prelude::*;
use log::{
    info,
    warn,
};

use crate::utils::{
    open_output,
    AnnotationArgs,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliFormat {
    Gff3,
    Gtf,
}

impl From<CliFormat> for GxfFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Gff3 => GxfFormat::Gff3,
            CliFormat::Gtf => GxfFormat::Gtf,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliKinds {
    Exon,
    Cds,
    Both,
}

impl From<CliKinds> for SegmentKinds {
    fn from(value: CliKinds) -> Self {
        match value {
            CliKinds::Exon => SegmentKinds::Exon,
            CliKinds::Cds => SegmentKinds::Cds,
            CliKinds::Both => SegmentKinds::Both,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ConvertArgs {
    #[clap(flatten)]
    annotation: AnnotationArgs,

    #[arg(
        short = 'o',
        long,
        help = "Path for the generated output file. Defaults to stdout."
    )]
    output: Option<PathBuf>,

    #[clap(short = 'f', long, value_enum, default_value_t = CliFormat::Gff3, help = "Output dialect.")]
    format: CliFormat,

    #[clap(short = 'k', long, value_enum, default_value_t = CliKinds::Both, help = "Child segments to write.")]
    kinds: CliKinds,

    #[arg(long, help = "Replace the source column with this label.")]
    track: Option<String>,

    #[arg(long, help = "Skip features with overlapping or duplicate exons.")]
    skip_errors: bool,
}

impl ConvertArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let registry = NameRegistry::new();
        let (features, _) = self.annotation.load(&registry, utils)?;

        let mode = PrintMode::new(self.format.into(), self.kinds.into());
        let mut writer = open_output(self.output.as_deref())?;
        let mut written = 0usize;
        for obj in features.iter() {
            if obj.has_errors() {
                if self.skip_errors {
                    continue;
                }
                warn!("Feature {} has overlapping or duplicate exons", obj.id());
            }
            obj.write_gxf(&mut writer, mode, self.track.as_deref())?;
            written += 1;
        }
        writer.flush()?;

        info!("Wrote {} of {} features", written, features.len());
        Ok(())
    }
}
