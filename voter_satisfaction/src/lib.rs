mod ballot;
pub mod builder;
mod config;
mod electorate;
mod grades;
pub mod manual;
mod method;
mod score;
mod voter;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use crate::ballot::*;
pub use crate::config::*;
pub use crate::electorate::*;
pub use crate::grades::*;
pub use crate::method::*;
pub use crate::score::*;
pub use crate::voter::*;

/// The results of all the methods on the electorate of one iteration.
pub type TrialResults = Vec<MethodVse>;

// Every iteration gets its own stream, so that iterations can be replayed independently.
fn iteration_rng(seed: Option<u64>, iteration: usize) -> ChaCha8Rng {
    match seed {
        Some(s) => {
            let mut rng = ChaCha8Rng::seed_from_u64(s);
            rng.set_stream(iteration as u64);
            rng
        }
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Runs `iterations` independent elections and measures the VSE of each method on them.
///
/// Each iteration generates a fresh electorate from `model`, with its own random stream
/// and its own cluster counter. All the methods then run on the same electorate. Given a
/// seed, the whole run is reproducible.
pub fn run_trials(
    model: &dyn ElectorateModel,
    methods: &[Box<dyn Method>],
    voter_kind: VoterKind,
    num_voters: usize,
    num_candidates: usize,
    iterations: usize,
    seed: Option<u64>,
) -> Result<Vec<TrialResults>, SimulationErrors> {
    info!(
        "run_trials: model: {} voters: {} candidates: {} iterations: {} methods: {:?}",
        model.describe(),
        num_voters,
        num_candidates,
        iterations,
        methods.iter().map(|m| m.name()).collect::<Vec<&str>>()
    );
    let mut all_results: Vec<TrialResults> = Vec::with_capacity(iterations);
    for iteration in 0..iterations {
        let mut rng = iteration_rng(seed, iteration);
        let mut factory = VoterFactory::new(voter_kind);
        let electorate = model.generate(num_voters, num_candidates, &mut factory, &mut rng)?;
        debug!(
            "run_trials: iteration {}: social utilities: {:?}",
            iteration,
            electorate.soc_utils()
        );
        let mut trial: TrialResults = Vec::with_capacity(methods.len());
        for method in methods.iter() {
            trial.push(method.vse_on(&electorate, &mut rng)?);
        }
        info!("run_trials: iteration {}: {:?}", iteration, trial);
        all_results.push(trial);
    }
    Ok(all_results)
}

fn mean_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let defined: Vec<f64> = values.flatten().collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / (defined.len() as f64))
    }
}

/// Aggregates the results of `run_trials`, per method.
///
/// The means only cover the defined VSE values. Methods are reported in the order of
/// the first iteration.
pub fn summarize(results: &[TrialResults]) -> Vec<MethodSummary> {
    let methods: Vec<String> = results
        .first()
        .map(|trial| trial.iter().map(|mv| mv.method.clone()).collect())
        .unwrap_or_default();
    methods
        .iter()
        .map(|name| {
            let rows: Vec<&MethodVse> = results
                .iter()
                .flat_map(|trial| trial.iter().filter(|mv| mv.method == *name))
                .collect();
            let undefined = rows
                .iter()
                .filter(|mv| mv.honest.is_none() || mv.strategic.is_none() || mv.one_sided.is_none())
                .count();
            let mattered = rows
                .iter()
                .filter(|mv| mv.winners[1] != mv.winners[2])
                .count();
            MethodSummary {
                method: name.clone(),
                iterations: rows.len(),
                mean_honest: mean_defined(rows.iter().map(|mv| mv.honest)),
                mean_strategic: mean_defined(rows.iter().map(|mv| mv.strategic)),
                mean_one_sided: mean_defined(rows.iter().map(|mv| mv.one_sided)),
                undefined,
                one_sided_mattered: if rows.is_empty() {
                    0.0
                } else {
                    (mattered as f64) / (rows.len() as f64)
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn all_methods() -> Vec<Box<dyn Method>> {
        vec![
            Box::new(Score),
            Box::new(GradeMethod::mav()),
            Box::new(GradeMethod::mj()),
            Box::new(GradeMethod::bucklin()),
        ]
    }

    fn mv(method: &str, vses: [Option<f64>; 3], winners: [usize; 3]) -> MethodVse {
        MethodVse {
            method: method.to_string(),
            honest: vses[0],
            strategic: vses[1],
            one_sided: vses[2],
            winners,
        }
    }

    #[test]
    fn run_trials_shape() {
        init();
        let methods = all_methods();
        let results = run_trials(
            &PolyaModel::default(),
            &methods,
            VoterKind::Personality,
            21,
            4,
            5,
            Some(11),
        )
        .unwrap();
        assert_eq!(results.len(), 5);
        for trial in results.iter() {
            let names: Vec<&str> = trial.iter().map(|mv| mv.method.as_str()).collect();
            assert_eq!(names, vec!["Score", "Mav", "Mj", "Bucklin"]);
            for mv in trial.iter() {
                assert!(mv.winners.iter().all(|w| *w < 4));
                for v in [mv.honest, mv.strategic, mv.one_sided].iter().flatten() {
                    assert!(v.is_finite());
                    // Never better than electing the best candidate.
                    assert!(*v <= 1.0 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn run_trials_is_reproducible() {
        init();
        let methods = all_methods();
        let run = |seed| {
            run_trials(&RandomModel, &methods, VoterKind::Plain, 15, 3, 4, Some(seed)).unwrap()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn run_trials_reports_model_errors() {
        let methods = all_methods();
        let res = run_trials(&ReverseModel, &methods, VoterKind::Plain, 7, 3, 2, Some(1));
        assert_eq!(res, Err(SimulationErrors::OddVoterCount(7)));
    }

    #[test]
    fn honest_score_is_good_on_random_electorates() {
        init();
        let methods: Vec<Box<dyn Method>> = vec![Box::new(Score)];
        let results =
            run_trials(&RandomModel, &methods, VoterKind::Plain, 51, 5, 40, Some(2)).unwrap();
        let summary = summarize(&results);
        let honest = summary[0].mean_honest.unwrap();
        assert!(honest > 0.5, "honest VSE {}", honest);
    }

    #[test]
    fn summarize_means_and_disagreements() {
        let results = vec![
            vec![mv("Score", [Some(1.0), Some(0.5), Some(0.0)], [0, 1, 2])],
            vec![mv("Score", [Some(0.0), Some(0.5), Some(1.0)], [1, 1, 1])],
            vec![mv("Score", [None, None, None], [2, 0, 0])],
        ];
        let summary = summarize(&results);
        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert_eq!(s.method, "Score");
        assert_eq!(s.iterations, 3);
        assert_eq!(s.mean_honest, Some(0.5));
        assert_eq!(s.mean_strategic, Some(0.5));
        assert_eq!(s.mean_one_sided, Some(0.5));
        assert_eq!(s.undefined, 1);
        assert_eq!(s.one_sided_mattered, 1.0 / 3.0);
    }

    #[test]
    fn summarize_nothing() {
        assert!(summarize(&[]).is_empty());
    }
}
