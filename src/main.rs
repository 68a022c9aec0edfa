// src/main.rs

use specmate::{RunOutcome, cli, logging, run};

fn main() {
    match run_main() {
        Ok(RunOutcome::Success) => {}
        Ok(RunOutcome::ChecksFailed) => std::process::exit(1),
        Err(err) => {
            eprintln!("specmate error: {err:?}");
            std::process::exit(2);
        }
    }
}

fn run_main() -> anyhow::Result<RunOutcome> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args)
}
