use log::debug;

use std::collections::HashMap;

use crate::config::{BallotKind, SimulationErrors};

/// The marks of one voter, one per candidate, in the scale of the method.
pub type Ballot = Vec<f64>;

/// A strategic ballot, and whether the voter departed from honest behaviour to cast it.
///
/// `used_strategy` is `None` when the voter could not tell the frontrunners apart.
#[derive(PartialEq, Debug, Clone)]
pub struct StrategicBallot {
    pub ballot: Ballot,
    pub used_strategy: Option<bool>,
}

/// What the voters know before casting strategic ballots: the two frontrunners of a poll.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Poll {
    pub winner: usize,
    pub runner_up: usize,
    pub winner_score: f64,
    pub runner_up_score: f64,
}

impl Poll {
    /// Takes the two highest scores of the poll results.
    ///
    /// Among equal scores, the candidate with the lower index is placed first.
    pub fn from_results(info: &[f64]) -> Result<Poll, SimulationErrors> {
        if info.len() < 2 {
            return Err(SimulationErrors::NotEnoughCandidates(info.len()));
        }
        let mut places: Vec<(usize, f64)> = info.iter().cloned().enumerate().collect();
        places.sort_by(|a, b| b.1.total_cmp(&a.1));
        let poll = Poll {
            winner: places[0].0,
            runner_up: places[1].0,
            winner_score: places[0].1,
            runner_up_score: places[1].1,
        };
        debug!("Poll::from_results: {:?} -> {:?}", info, poll);
        Ok(poll)
    }
}

/// Selects the ballot that a voter casts, for one of the ballot kinds.
///
/// The strategic maker carries the poll it was built from.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum BallotMaker {
    Honest,
    Strategic(Poll),
    OneSided,
}

impl BallotMaker {
    pub fn kind(&self) -> BallotKind {
        match self {
            BallotMaker::Honest => BallotKind::Honest,
            BallotMaker::Strategic(_) => BallotKind::Strategic,
            BallotMaker::OneSided => BallotKind::OneSided,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
struct MemoKey {
    method: String,
    kind: BallotKind,
}

/// The last ballot of a given kind cast by a voter for a method.
#[derive(PartialEq, Debug, Clone)]
pub struct MemoEntry {
    pub ballot: Ballot,
    pub used_strategy: Option<bool>,
}

/// The annotations attached to one voter during one simulated election.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct VoterMemo {
    entries: HashMap<MemoKey, MemoEntry>,
}

impl VoterMemo {
    pub fn get(&self, method: &str, kind: BallotKind) -> Option<&MemoEntry> {
        self.entries.get(&MemoKey {
            method: method.to_string(),
            kind,
        })
    }

    pub fn record(&mut self, method: &str, kind: BallotKind, entry: MemoEntry) {
        self.entries.insert(
            MemoKey {
                method: method.to_string(),
                kind,
            },
            entry,
        );
    }

    /// True if the voter cast a strategic ballot for this method that departs from honesty.
    /// A voter without a recorded flag is not strategic.
    pub fn used_strategy(&self, method: &str) -> bool {
        self.get(method, BallotKind::Strategic)
            .and_then(|e| e.used_strategy)
            .unwrap_or(false)
    }
}

/// The ballot memos of all the voters of an electorate, by voter index.
///
/// A ledger belongs to one simulated election: it must not be shared between elections
/// running at the same time.
#[derive(PartialEq, Debug, Clone)]
pub struct BallotLedger {
    memos: Vec<VoterMemo>,
}

impl BallotLedger {
    pub fn new(num_voters: usize) -> BallotLedger {
        BallotLedger {
            memos: vec![VoterMemo::default(); num_voters],
        }
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn memo(&self, voter: usize) -> Option<&VoterMemo> {
        self.memos.get(voter)
    }

    pub(crate) fn memo_mut(&mut self, voter: usize) -> Option<&mut VoterMemo> {
        self.memos.get_mut(voter)
    }

    /// The number of voters that used strategy for the given method.
    pub fn count_strategic(&self, method: &str) -> usize {
        self.memos
            .iter()
            .filter(|m| m.used_strategy(method))
            .count()
    }
}
