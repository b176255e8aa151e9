use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use frameval::{score_corpus, ErrorInventory, OutputFormat, ScorerConfigBuilder, TokenCheck};
use log::LevelFilter;

/// Score the frames predicted by a parser (PRED) against gold annotations (GOLD).
/// Both files are JSON lines, one sentence per line, read in lockstep.
/// The scores go to stdout, the missed and extra targets to stderr.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Argv {
    /// gold annotations
    #[arg(value_name = "GOLD")]
    gold: PathBuf,
    /// parser output
    #[arg(value_name = "PRED")]
    pred: PathBuf,
    /// output format of the scores: table, csv, html or json
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// what to do when gold and predicted tokens differ: disabled, warn or strict
    #[arg(short, long, default_value_t = TokenCheck::Disabled)]
    token_check: TokenCheck,
    /// log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Argv {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn run(argv: &Argv) -> frameval::Result<()> {
    let config = ScorerConfigBuilder::new()
        .token_check(argv.token_check)
        .build();
    log::info!("{}", config);
    let gold = BufReader::new(File::open(&argv.gold)?);
    let pred = BufReader::new(File::open(&argv.pred)?);
    let mut errors = ErrorInventory::new();
    let scores = score_corpus(gold, pred, &config, &mut errors)?;
    eprintln!("{}", errors);
    print!("{}", scores.render(argv.format)?);
    Ok(())
}

fn main() -> ExitCode {
    let argv = Argv::parse();
    // RUST_LOG, when set, takes precedence over the flags.
    env_logger::builder()
        .filter_level(argv.log_level())
        .parse_default_env()
        .init();
    log::debug!("{:?}", argv);
    match run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
