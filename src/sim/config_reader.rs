use crate::args::Args;
use crate::sim::*;
use voter_satisfaction::builder::Builder;

use serde::{Deserialize, Serialize};

pub const DEFAULT_VOTERS: usize = 100;
pub const DEFAULT_CANDIDATES: usize = 4;
pub const DEFAULT_ITERATIONS: usize = 100;
pub const ALL_METHODS: [&str; 4] = ["score", "mav", "mj", "bucklin"];

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(rename = "qualityWeight", skip_serializing_if = "Option::is_none")]
    pub quality_weight: Option<f64>,
    #[serde(rename = "baseModel", skip_serializing_if = "Option::is_none")]
    pub base_model: Option<Box<ModelSettings>>,
    #[serde(rename = "seedVoters", skip_serializing_if = "Option::is_none")]
    pub seed_voters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<usize>,
    #[serde(rename = "mutantFactor", skip_serializing_if = "Option::is_none")]
    pub mutant_factor: Option<f64>,
    #[serde(rename = "seedModel", skip_serializing_if = "Option::is_none")]
    pub seed_model: Option<Box<ModelSettings>>,
}

impl ModelSettings {
    pub fn of_type(model_type: &str) -> ModelSettings {
        ModelSettings {
            model_type: model_type.to_string(),
            quality_weight: None,
            base_model: None,
            seed_voters: None,
            alpha: None,
            mutant_factor: None,
            seed_model: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(rename = "voterCount")]
    pub voter_count: Option<usize>,
    #[serde(rename = "candidateCount")]
    pub candidate_count: Option<usize>,
    pub iterations: Option<usize>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<u64>,
    #[serde(rename = "voterKind")]
    pub voter_kind: Option<String>,
    pub methods: Option<Vec<String>>,
    pub model: Option<ModelSettings>,
}

impl SimConfig {
    /// Applies the command line options on top of this configuration, and fills in
    /// the defaults for everything that is still missing.
    pub fn resolve(self, args: &Args) -> SimConfig {
        let voter_kind = if args.personality {
            Some("personality".to_string())
        } else {
            self.voter_kind
        };
        SimConfig {
            voter_count: args.voters.or(self.voter_count).or(Some(DEFAULT_VOTERS)),
            candidate_count: args
                .candidates
                .or(self.candidate_count)
                .or(Some(DEFAULT_CANDIDATES)),
            iterations: args
                .iterations
                .or(self.iterations)
                .or(Some(DEFAULT_ITERATIONS)),
            random_seed: args.seed.or(self.random_seed),
            voter_kind: voter_kind.or_else(|| Some("plain".to_string())),
            methods: args
                .method
                .clone()
                .or(self.methods)
                .or_else(|| Some(ALL_METHODS.iter().map(|s| s.to_string()).collect())),
            model: args
                .model
                .as_deref()
                .map(ModelSettings::of_type)
                .or(self.model)
                .or_else(|| Some(ModelSettings::of_type("polya"))),
        }
    }
}

pub fn read_config(path: String) -> SimResult<SimConfig> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let config: SimConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn validate_model(settings: &ModelSettings) -> SimResult<Box<dyn ElectorateModel>> {
    let res: Box<dyn ElectorateModel> = match settings.model_type.as_str() {
        "random" => Box::new(RandomModel),
        "reverse" => Box::new(ReverseModel),
        "quality" => {
            let default = QualityModel::default();
            let quality_weight = settings.quality_weight.unwrap_or(default.quality_weight);
            if !quality_weight.is_finite() {
                whatever!("qualityWeight must be a finite number: {}", quality_weight)
            }
            let base = match settings.base_model.as_deref() {
                Some(base) => validate_model(base)?,
                None => default.base,
            };
            Box::new(QualityModel::new(quality_weight, base))
        }
        "polya" => {
            let default = PolyaModel::default();
            let mutant_factor = settings.mutant_factor.unwrap_or(default.mutant_factor);
            if !mutant_factor.is_finite() {
                whatever!("mutantFactor must be a finite number: {}", mutant_factor)
            }
            Box::new(PolyaModel {
                seed_voters: settings.seed_voters.unwrap_or(default.seed_voters),
                alpha: settings.alpha.unwrap_or(default.alpha),
                seed_model: match settings.seed_model.as_deref() {
                    Some(seed) => validate_model(seed)?,
                    None => default.seed_model,
                },
                mutant_factor,
            })
        }
        x => {
            whatever!(
                "Cannot use model {:?}: expected one of random, reverse, quality, polya",
                x
            )
        }
    };
    Ok(res)
}

pub fn validate_method(name: &str) -> SimResult<Box<dyn Method>> {
    let res: Box<dyn Method> = match name.to_lowercase().as_str() {
        "score" => Box::new(Score),
        "mav" => Box::new(GradeMethod::mav()),
        "mj" => Box::new(GradeMethod::mj()),
        "bucklin" => Box::new(GradeMethod::bucklin()),
        x => {
            whatever!(
                "Cannot use method {:?}: expected one of score, mav, mj, bucklin",
                x
            )
        }
    };
    Ok(res)
}

pub fn validate_voter_kind(kind: &str) -> SimResult<VoterKind> {
    match kind {
        "plain" => Ok(VoterKind::Plain),
        "personality" => Ok(VoterKind::Personality),
        x => whatever!("Cannot use voter kind {:?}: expected plain or personality", x),
    }
}

/// Turns a resolved configuration into a ready-to-run simulation.
pub fn validate_config(config: &SimConfig) -> SimResult<Builder> {
    let model = match &config.model {
        Some(m) => validate_model(m)?,
        None => whatever!("Missing model"),
    };
    let mut builder = Builder::new(model).context(SimulationSnafu {})?;
    if let Some(n) = config.voter_count {
        builder = builder.voters(n).context(SimulationSnafu {})?;
    }
    if let Some(n) = config.candidate_count {
        builder = builder.candidates(n).context(SimulationSnafu {})?;
    }
    if let Some(n) = config.iterations {
        builder = builder.iterations(n).context(SimulationSnafu {})?;
    }
    if let Some(seed) = config.random_seed {
        builder = builder.seed(seed).context(SimulationSnafu {})?;
    }
    if let Some(kind) = &config.voter_kind {
        builder = builder
            .voter_kind(validate_voter_kind(kind)?)
            .context(SimulationSnafu {})?;
    }
    let methods = config.methods.clone().unwrap_or_default();
    if methods.is_empty() {
        whatever!("No method to simulate")
    }
    for name in methods.iter() {
        builder = builder
            .method(validate_method(name)?)
            .context(SimulationSnafu {})?;
    }
    Ok(builder)
}
