pub use crate::config::*;
use crate::electorate::{ElectorateModel, PolyaModel};
use crate::method::Method;
use crate::voter::VoterKind;
use crate::TrialResults;

/// A builder for setting up a simulation run.
///
/// ```
/// pub use voter_satisfaction::builder::Builder;
/// pub use voter_satisfaction::{GradeMethod, PolyaModel, Score};
/// # use voter_satisfaction::SimulationErrors;
///
/// let results = Builder::new(Box::new(PolyaModel::default()))?
///     .voters(21)?
///     .candidates(4)?
///     .iterations(3)?
///     .method(Box::new(Score))?
///     .method(Box::new(GradeMethod::mav()))?
///     .seed(42)?
///     .run()?;
/// assert_eq!(results.len(), 3);
///
/// # Ok::<(), SimulationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _model: Box<dyn ElectorateModel>,
    pub(crate) _methods: Vec<Box<dyn Method>>,
    pub(crate) _voter_kind: VoterKind,
    pub(crate) _voters: usize,
    pub(crate) _candidates: usize,
    pub(crate) _iterations: usize,
    pub(crate) _seed: Option<u64>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            _model: Box::new(PolyaModel::default()),
            _methods: Vec::new(),
            _voter_kind: VoterKind::Plain,
            _voters: 100,
            _candidates: 4,
            _iterations: 100,
            _seed: None,
        }
    }
}

impl Builder {
    pub fn new(model: Box<dyn ElectorateModel>) -> Result<Builder, SimulationErrors> {
        Ok(Builder {
            _model: model,
            ..Builder::default()
        })
    }

    pub fn voters(self, num_voters: usize) -> Result<Builder, SimulationErrors> {
        if num_voters == 0 {
            return Err(SimulationErrors::EmptyElectorate);
        }
        Ok(Builder {
            _voters: num_voters,
            ..self
        })
    }

    /// Sets the number of candidates. Strategic ballots need at least two of them.
    pub fn candidates(self, num_candidates: usize) -> Result<Builder, SimulationErrors> {
        if num_candidates < 2 {
            return Err(SimulationErrors::NotEnoughCandidates(num_candidates));
        }
        Ok(Builder {
            _candidates: num_candidates,
            ..self
        })
    }

    pub fn iterations(self, iterations: usize) -> Result<Builder, SimulationErrors> {
        Ok(Builder {
            _iterations: iterations,
            ..self
        })
    }

    pub fn voter_kind(self, kind: VoterKind) -> Result<Builder, SimulationErrors> {
        Ok(Builder {
            _voter_kind: kind,
            ..self
        })
    }

    /// Fixes the seed of the run. Without a seed, every run is different.
    pub fn seed(self, seed: u64) -> Result<Builder, SimulationErrors> {
        Ok(Builder {
            _seed: Some(seed),
            ..self
        })
    }

    /// Adds a method to compare. Methods are reported in the order they are added.
    pub fn method(mut self, method: Box<dyn Method>) -> Result<Builder, SimulationErrors> {
        self._methods.push(method);
        Ok(self)
    }

    pub fn model_description(&self) -> String {
        self._model.describe()
    }

    pub fn method_names(&self) -> Vec<String> {
        self._methods.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn run(&self) -> Result<Vec<TrialResults>, SimulationErrors> {
        crate::run_trials(
            self._model.as_ref(),
            &self._methods,
            self._voter_kind,
            self._voters,
            self._candidates,
            self._iterations,
            self._seed,
        )
    }
}
