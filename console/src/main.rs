mod convert;
mod splice;
mod stats;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use convert::ConvertArgs;
use splice::SpliceArgs;
use stats::StatsArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Re-serialize an annotation as GFF3 or GTF.
    Convert {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ConvertArgs,
    },

    /// Write spliced transcripts, CDS or proteins as FASTA.
    Splice {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SpliceArgs,
    },

    /// Per-contig feature statistics.
    Stats {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  StatsArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Convert { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Splice { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Stats { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
