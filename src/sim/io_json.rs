use crate::sim::*;

use serde_json::json;
use serde_json::Value as JSValue;

fn method_vse_to_json(mv: &MethodVse) -> JSValue {
    json!({
        "method": mv.method,
        "vse": {
            "hon": mv.honest,
            "strat": mv.strategic,
            "oss": mv.one_sided,
        },
        "winners": mv.winners.to_vec(),
    })
}

fn results_to_json(results: &[TrialResults]) -> Vec<JSValue> {
    results
        .iter()
        .enumerate()
        .map(|(idx, trial)| {
            let methods: Vec<JSValue> = trial.iter().map(method_vse_to_json).collect();
            json!({"iteration": idx, "methods": methods})
        })
        .collect()
}

fn summary_to_json(summary: &[MethodSummary]) -> Vec<JSValue> {
    summary
        .iter()
        .map(|s| {
            json!({
                "method": s.method,
                "iterations": s.iterations,
                "meanVse": {
                    "hon": s.mean_honest,
                    "strat": s.mean_strategic,
                    "oss": s.mean_one_sided,
                },
                "undefined": s.undefined,
                "oneSidedMattered": s.one_sided_mattered,
            })
        })
        .collect()
}

pub fn build_output_js(
    config: &SimConfig,
    results: &[TrialResults],
    summary: &[MethodSummary],
) -> JSValue {
    json!({
        "config": config,
        "summary": summary_to_json(summary),
        "iterations": results_to_json(results),
    })
}

/// Writes the output either to a file or, for the special value `stdout`, to the standard output.
pub fn write_output(pretty_js: &str, out: &str) -> SimResult<()> {
    if out == "stdout" || out.is_empty() {
        println!("{}", pretty_js);
    } else {
        info!("write_output: writing results to {:?}", out);
        fs::write(out, pretty_js).context(WritingJsonSnafu {
            path: out.to_string(),
        })?;
    }
    Ok(())
}

pub fn read_reference(path: String) -> SimResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
