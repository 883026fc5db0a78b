use log::{debug, info, warn};

use snafu::{prelude::*, ErrorCompat, Snafu};
use voter_satisfaction::*;

use std::fs;

use text_diff::print_diff;

use crate::args::Args;
use crate::sim::config_reader::*;
use crate::sim::io_json::*;

pub mod config_reader;
pub mod io_json;

#[derive(Debug, Snafu)]
pub enum SimError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Simulation failed: {source}"))]
    Simulation { source: SimulationErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SimResult<T> = Result<T, SimError>;

fn format_vse(x: Option<f64>) -> String {
    match x {
        Some(v) => format!("{:.3}", v),
        None => "undefined".to_string(),
    }
}

fn print_summary(summary: &[MethodSummary]) {
    for s in summary.iter() {
        info!(
            "{}: honest {} strategic {} one-sided {} (undefined: {}, one-sided mattered: {:.2})",
            s.method,
            format_vse(s.mean_honest),
            format_vse(s.mean_strategic),
            format_vse(s.mean_one_sided),
            s.undefined,
            s.one_sided_mattered
        );
    }
}

/// Runs a full simulation from the command line arguments.
pub fn run_simulation(args: &Args) -> SimResult<()> {
    let file_config = match args.config.clone() {
        Some(path) => read_config(path)?,
        None => SimConfig::default(),
    };
    let config = file_config.resolve(args);
    info!("config: {:?}", config);

    let builder = validate_config(&config)?;
    debug!(
        "run_simulation: model: {} methods: {:?}",
        builder.model_description(),
        builder.method_names()
    );

    let results = builder.run().context(SimulationSnafu {})?;
    let summary = summarize(&results);
    print_summary(&summary);

    let result_js = build_output_js(&config, &results, &summary);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    if let Some(out) = args.out.clone() {
        write_output(&pretty_js, out.as_str())?;
    }

    // The reference results, if provided for comparison
    if let Some(reference_p) = args.reference.clone() {
        let reference = read_reference(reference_p)?;
        // Both sides go through the same parser, so that floats compare exactly.
        let fresh: serde_json::Value =
            serde_json::from_str(pretty_js.as_str()).context(ParsingJsonSnafu {})?;
        if reference != fresh {
            warn!("Found differences with the reference results");
            let pretty_reference =
                serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between the results and the reference results")
        }
        info!("run_simulation: results match the reference");
    }

    Ok(())
}

pub fn report_error(e: &SimError) {
    warn!("Error occured {:?}", e);
    eprintln!("An error occured {}", e);
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}
