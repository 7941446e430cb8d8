mod bloom;
mod meta;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use bloom::exec_bloom;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use meta::exec_meta;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Print the row groups and column statistics of a file
    Meta {
        file: PathBuf,
        /// Print the full metadata tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Test whether a value may be present according to a bloom filter
    Bloom {
        file: PathBuf,
        value: String,
        /// Probe the filter of this column in every row group
        #[arg(long, required_unless_present = "offset", conflicts_with = "offset")]
        column: Option<String>,
        /// Probe the filter starting at this byte offset
        #[arg(long)]
        offset: Option<u64>,
        /// Length of the filter at `--offset`, derived from its header when omitted
        #[arg(long, requires = "offset")]
        length: Option<u64>,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Meta { file, json } => exec_meta(file, json),
        Commands::Bloom {
            file,
            value,
            column,
            offset,
            length,
        } => exec_bloom(file, &value, column.as_deref(), offset, length),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rugo: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bloom_needs_a_target() {
        assert!(Cli::try_parse_from(["rugo", "bloom", "f.parquet", "v"]).is_err());
        assert!(
            Cli::try_parse_from(["rugo", "bloom", "f.parquet", "v", "--column", "a", "--offset", "4"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["rugo", "bloom", "f.parquet", "v", "--length", "44"]).is_err());
        assert!(Cli::try_parse_from(["rugo", "-vv", "bloom", "f.parquet", "v", "--offset", "4"]).is_ok());
    }
}
