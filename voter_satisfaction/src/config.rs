// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The kinds of ballots a voter can cast for a given method.
///
/// For one voter and one method, the kinds are produced in order: honest, then strategic,
/// then one-sided. A one-sided ballot is only a selection between the two previous ones.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum BallotKind {
    Honest,
    Strategic,
    OneSided,
}

impl Display for BallotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BallotKind::Honest => "hon",
            BallotKind::Strategic => "strat",
            BallotKind::OneSided => "oss",
        };
        write!(f, "{}", s)
    }
}

// ******** Output data structures *********

/// The satisfaction efficiencies of one method on one electorate.
///
/// A VSE is `None` when it is undefined, which happens when all the candidates
/// have the same social utility.
#[derive(PartialEq, Debug, Clone)]
pub struct MethodVse {
    pub method: String,
    pub honest: Option<f64>,
    pub strategic: Option<f64>,
    pub one_sided: Option<f64>,
    /// The winners for the honest, strategic and one-sided elections.
    pub winners: [usize; 3],
}

/// Statistics for one method across all the iterations of a run.
#[derive(PartialEq, Debug, Clone)]
pub struct MethodSummary {
    pub method: String,
    pub iterations: usize,
    pub mean_honest: Option<f64>,
    pub mean_strategic: Option<f64>,
    pub mean_one_sided: Option<f64>,
    pub undefined: usize,
    /// Fraction of the iterations in which the strategic and the one-sided
    /// elections picked different winners.
    pub one_sided_mattered: f64,
}

/// Errors that prevent a simulated election from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum SimulationErrors {
    /// Two utility vectors that should be aligned have different lengths.
    LengthMismatch { expected: usize, found: usize },
    /// The mirrored polarization model needs an even number of voters.
    OddVoterCount(usize),
    /// A ballot was requested before the ballots it depends on were cast.
    MissingBallot {
        method: String,
        kind: BallotKind,
        voter: usize,
    },
    NotEnoughCandidates(usize),
    EmptyElectorate,
}

impl Error for SimulationErrors {}

impl Display for SimulationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationErrors::LengthMismatch { expected, found } => write!(
                f,
                "utility vectors differ in length: expected {}, found {}",
                expected, found
            ),
            SimulationErrors::OddVoterCount(n) => {
                write!(f, "the number of voters must be even, got {}", n)
            }
            SimulationErrors::MissingBallot {
                method,
                kind,
                voter,
            } => write!(
                f,
                "voter {} has no {}_{} ballot recorded yet",
                voter, method, kind
            ),
            SimulationErrors::NotEnoughCandidates(n) => {
                write!(f, "not enough candidates for this election: {}", n)
            }
            SimulationErrors::EmptyElectorate => write!(f, "the electorate has no voters"),
        }
    }
}
