use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use nbody_pairwise::{harness, parse_exponent, RunConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Problem size exponent, N = 2^EXPONENT. Non-numeric values use the default of 14.
    exponent: Option<String>,
}

fn main() -> Result<()> {
    initialize_logging()?;
    let args = Args::parse();

    let config = RunConfig::new(parse_exponent(args.exponent.as_deref()));
    let report = harness::run(&config)?;
    if !report.all_passed() {
        log::info!("at least one strategy disagreed with the serial result");
    }

    Ok(())
}

fn initialize_logging() -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;

    log4rs::init_config(config)?;
    Ok(())
}
