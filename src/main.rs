mod args;
mod sim;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    debug!("args {:?}", args);

    let res = sim::run_simulation(&args);
    if let Err(e) = res {
        sim::report_error(&e);
        std::process::exit(1);
    }
}
