use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use ngram_join::cli::Args;
use ngram_join::{join_files, logging, Result};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ngram-join: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let options = args.options()?;
    debug!(?options, "starting join");
    join_files(&args.left_file, &args.right_file, &args.output, &options)?;
    Ok(())
}
