use std::fs::File;
use std::io::{
    stdout,
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use clap::Args;
use console::style;
use gffkit::prelude::*;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::{
    info,
    LevelFilter,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)."
    )]
    pub verbose: u8,
    #[arg(long, help = "Do not display the progress spinner.")]
    pub quiet:   bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()?;
        Ok(())
    }
}

/// Annotation input and the loader switches shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct AnnotationArgs {
    #[arg(required = true, help = "Path to the GFF3/GTF annotation.")]
    pub input:            PathBuf,
    #[arg(
        long,
        help = "JSON file with loader settings. Flags below override it."
    )]
    pub config:           Option<PathBuf>,
    #[arg(
        long,
        help = "Group records in input order instead of indexing the whole file."
    )]
    pub streaming:        bool,
    #[arg(long, help = "Merge exons separated by introns of 5 bases or less.")]
    pub merge:            bool,
    #[arg(long, help = "Only load transcript, exon and CDS records.")]
    pub transcripts_only: bool,
    #[arg(long, help = "Keep attributes of exon and CDS records.")]
    pub exon_attrs:       bool,
}

impl AnnotationArgs {
    pub fn reader_config(&self) -> anyhow::Result<GffReaderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                validate_input(path)?;
                GffReaderConfig::from_json_file(path)?
            },
            None => GffReaderConfig::default(),
        };
        if self.streaming {
            config = config.with_mode(ReadMode::Streaming);
        }
        if self.merge {
            config = config.with_merge_close_exons(true);
        }
        if self.transcripts_only {
            config = config.with_transcripts_only(true);
        }
        if self.exon_attrs {
            config = config.with_no_exon_attrs(false);
        }
        Ok(config)
    }

    /// Loads every feature of the input with a spinner running.
    pub fn load(
        &self,
        registry: &Rc<NameRegistry>,
        utils: &UtilsArgs,
    ) -> anyhow::Result<(Vec<GffObj>, SeqStats)> {
        validate_input(&self.input)?;
        let config = self.reader_config()?;
        let mut reader = GffReader::from_path(&self.input, registry, config)?;
        info!("Created reader at {}", self.input.display());

        let spinner = init_spinner(utils.quiet)?;
        spinner.set_message(format!("Reading {}", self.input.display()));
        let features = reader.load().map_err(|err| {
            spinner.abandon();
            err
        })?;
        spinner.finish_and_clear();
        info!("Loaded {} features", features.len());

        Ok((features, reader.seq_stats().clone()))
    }
}

pub fn init_spinner(hidden: bool) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

pub fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("Path {} does not exist.", style(path.display()).red());
    }
    if !path.is_file() {
        bail!("Path {} is not a file.", style(path.display()).red());
    }
    Ok(())
}

/// Buffered writer to `path`, or to stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            info!("Writing to {}", path.display());
            Ok(Box::new(BufWriter::new(file)))
        },
        None => Ok(Box::new(BufWriter::new(stdout().lock()))),
    }
}
