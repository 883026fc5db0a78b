use log::debug;
use rand::{Rng, RngCore};

use std::cell::OnceCell;

use crate::config::SimulationErrors;
use crate::voter::{Voter, VoterFactory};

/// An ordered list of voters, all with the same number of candidates.
///
/// The order has no effect on the outcomes, but it is kept stable so that a seeded
/// run always processes the voters in the same sequence.
#[derive(Debug, Clone)]
pub struct Electorate {
    voters: Vec<Voter>,
    ncand: usize,
    soc_utils: OnceCell<Vec<f64>>,
}

impl Electorate {
    /// Builds an electorate. All the voters must have the same number of candidates.
    pub fn new(voters: Vec<Voter>) -> Result<Electorate, SimulationErrors> {
        let ncand = voters.first().map(|v| v.len()).unwrap_or(0);
        if let Some(v) = voters.iter().find(|v| v.len() != ncand) {
            return Err(SimulationErrors::LengthMismatch {
                expected: ncand,
                found: v.len(),
            });
        }
        Ok(Electorate {
            voters,
            ncand,
            soc_utils: OnceCell::new(),
        })
    }

    pub fn from_utilities(utils: &[Vec<f64>]) -> Result<Electorate, SimulationErrors> {
        Electorate::new(utils.iter().map(|u| Voter::new(u.clone())).collect())
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    pub fn into_voters(self) -> Vec<Voter> {
        self.voters
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn num_candidates(&self) -> usize {
        self.ncand
    }

    /// The mean utility of each candidate over all the voters.
    ///
    /// Computed on first access and cached afterwards.
    pub fn soc_utils(&self) -> &[f64] {
        self.soc_utils.get_or_init(|| {
            let n = self.voters.len() as f64;
            (0..self.ncand)
                .map(|c| self.voters.iter().map(|v| v.utilities()[c]).sum::<f64>() / n)
                .collect()
        })
    }
}

/// A factory of electorates.
///
/// The outcome is only deterministic up to the random source: two calls with the same
/// seeded generator produce the same electorate.
pub trait ElectorateModel {
    fn generate(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<Electorate, SimulationErrors>;

    /// A short description, used in the logs and the persisted results.
    fn describe(&self) -> String;
}

/// Independent voters, each with standard normal utilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomModel;

impl ElectorateModel for RandomModel {
    fn generate(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<Electorate, SimulationErrors> {
        Electorate::new((0..nvot).map(|_| factory.rand_voter(ncand, rng)).collect())
    }

    fn describe(&self) -> String {
        "random".to_string()
    }
}

/// Two camps of the same size with exactly opposite utilities.
///
/// Every member of a camp is the same voter: one camp repeats a random voter, the
/// other camp repeats its negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseModel;

impl ElectorateModel for ReverseModel {
    fn generate(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<Electorate, SimulationErrors> {
        if nvot % 2 != 0 {
            return Err(SimulationErrors::OddVoterCount(nvot));
        }
        let base = factory.rand_voter(ncand, rng);
        let opposite = base.negated();
        let mut voters = vec![base; nvot / 2];
        voters.extend(std::iter::repeat(opposite).take(nvot / 2));
        Electorate::new(voters)
    }

    fn describe(&self) -> String {
        "reverse".to_string()
    }
}

/// Adds a quality dimension shared by the whole electorate to a base model.
///
/// All the voters of the base electorate are blended with one common random voter.
/// Together with `ReverseModel`, this gives a poor man's 2d model.
pub struct QualityModel {
    pub quality_weight: f64,
    pub base: Box<dyn ElectorateModel>,
}

impl QualityModel {
    pub fn new(quality_weight: f64, base: Box<dyn ElectorateModel>) -> QualityModel {
        QualityModel {
            quality_weight,
            base,
        }
    }
}

impl Default for QualityModel {
    fn default() -> Self {
        QualityModel::new(1.0, Box::new(ReverseModel))
    }
}

impl ElectorateModel for QualityModel {
    fn generate(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<Electorate, SimulationErrors> {
        let qualities = Voter::rand(ncand, rng);
        debug!("QualityModel: qualities: {:?}", qualities.utilities());
        let base = self.base.generate(nvot, ncand, factory, rng)?;
        let voters = base
            .voters()
            .iter()
            .map(|v| v.hybrid_with(&qualities, self.quality_weight))
            .collect::<Result<Vec<Voter>, SimulationErrors>>()?;
        Electorate::new(voters)
    }

    fn describe(&self) -> String {
        format!("quality({}, {})", self.quality_weight, self.base.describe())
    }
}

/// Where a voter of a Polya electorate comes from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Origin {
    Seed,
    Wildcard,
    /// A mutated clone of the voter at this index.
    Mutant(usize),
}

/// Polya urn (Hoppe / Dirichlet process) with mutation.
///
/// The urn starts with `seed_voters` voters from `seed_model`, plus `alpha` wildcards.
/// Each draw of a voter adds a mutated clone of that voter to the urn; each draw of a
/// wildcard adds a fresh random voter. Voters that were drawn become more likely to be
/// drawn again, which grows clusters without fixing their number in advance.
pub struct PolyaModel {
    pub seed_voters: usize,
    pub alpha: usize,
    pub seed_model: Box<dyn ElectorateModel>,
    pub mutant_factor: f64,
}

impl Default for PolyaModel {
    fn default() -> Self {
        PolyaModel {
            seed_voters: 2,
            alpha: 1,
            seed_model: Box::new(QualityModel::default()),
            mutant_factor: 0.2,
        }
    }
}

impl PolyaModel {
    /// Same as `generate`, but also reports the origin of each voter.
    pub fn generate_with_lineage(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<(Electorate, Vec<Origin>), SimulationErrors> {
        let mut voters = self
            .seed_model
            .generate(self.seed_voters, ncand, factory, rng)?
            .into_voters();
        voters.truncate(nvot);
        let mut lineage = vec![Origin::Seed; voters.len()];
        // Nothing to draw from.
        if voters.is_empty() && self.alpha == 0 && nvot > 0 {
            return Err(SimulationErrors::EmptyElectorate);
        }
        while voters.len() < nvot {
            let i = rng.random_range(0..(voters.len() + self.alpha));
            if i < voters.len() {
                let child = voters[i].mutant_child(self.mutant_factor, rng);
                voters.push(child);
                lineage.push(Origin::Mutant(i));
            } else {
                voters.push(factory.rand_voter(ncand, rng));
                lineage.push(Origin::Wildcard);
            }
        }
        debug!(
            "PolyaModel: {} voters, {} wildcards",
            voters.len(),
            lineage.iter().filter(|o| **o == Origin::Wildcard).count()
        );
        Ok((Electorate::new(voters)?, lineage))
    }
}

impl ElectorateModel for PolyaModel {
    fn generate(
        &self,
        nvot: usize,
        ncand: usize,
        factory: &mut VoterFactory,
        rng: &mut dyn RngCore,
    ) -> Result<Electorate, SimulationErrors> {
        self.generate_with_lineage(nvot, ncand, factory, rng)
            .map(|(e, _)| e)
    }

    fn describe(&self) -> String {
        format!(
            "polya({}, {}, {}, {})",
            self.seed_voters,
            self.alpha,
            self.seed_model.describe(),
            self.mutant_factor
        )
    }
}
