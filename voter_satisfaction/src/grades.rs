use crate::ballot::*;
use crate::method::Method;
use crate::voter::Voter;

/// The default grade cutoffs, in utility units.
///
/// A utility below or at `BASE_CUTS[i]` receives grade `i` (0 is the worst grade,
/// 4 the best).
pub const BASE_CUTS: [f64; 4] = [-0.8, 0.0, 0.8, 1.6];

/// The highest grade.
pub const TOP_GRADE: f64 = 4.0;

/// The rules of the grade-based family, which differ in how the median grade is refined.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MedianRule {
    /// Majority approval voting: the fewer votes tie the median from above,
    /// the higher the score.
    Mav,
    /// Majority judgment: compares the ties below and above the median.
    Mj,
    /// Bucklin: the larger the majority at the median grade, the higher the score.
    Bucklin,
}

/// Maps one utility to a grade, using cutoffs.
///
/// Returns the first grade whose cutoff is at or above the utility, and the top grade
/// if there is none.
pub fn to_vote(cutoffs: &[f64], util: f64) -> f64 {
    cutoffs
        .iter()
        .position(|c| util <= *c)
        .unwrap_or(cutoffs.len()) as f64
}

/// A grade-based method: each voter grades each candidate from 0 to 4, and candidates are
/// ranked by their median grade, refined to break ties between equal medians.
#[derive(Debug, Clone, Copy)]
pub struct GradeMethod {
    pub rule: MedianRule,
    pub base_cuts: [f64; 4],
}

impl GradeMethod {
    pub fn new(rule: MedianRule) -> GradeMethod {
        GradeMethod {
            rule,
            base_cuts: BASE_CUTS,
        }
    }

    pub fn mav() -> GradeMethod {
        GradeMethod::new(MedianRule::Mav)
    }

    pub fn mj() -> GradeMethod {
        GradeMethod::new(MedianRule::Mj)
    }

    pub fn bucklin() -> GradeMethod {
        GradeMethod::new(MedianRule::Bucklin)
    }

    /// The cutoffs of an honest voter: the base cutoffs, with the top one capped by the
    /// voter's favourite.
    fn honest_cutoffs(&self, voter: &Voter) -> [f64; 4] {
        let mut cutoffs = self.base_cuts;
        cutoffs[3] = cutoffs[3].min(voter.top());
        cutoffs
    }

    /// The cutoffs of a strategic voter, given its utilities for the preferred and the
    /// other frontrunner.
    ///
    /// The grades around the poll scores of the frontrunners are pinned at the utility of
    /// the other frontrunner, so that it receives at most the grade just below the
    /// runner-up's poll score while the preferred one gets a grade above the winner's.
    fn strategic_cutoffs(
        &self,
        voter: &Voter,
        poll: &Poll,
        preferred: f64,
        other: f64,
    ) -> [f64; 4] {
        let top = voter.top();
        let runner_floor = poll.runner_up_score.floor() as i64;
        let winner_floor = poll.winner_score.floor() as i64;
        let mut cutoffs = [0.0; 4];
        for (i, cutoff) in cutoffs.iter_mut().enumerate() {
            let grade = i as i64;
            *cutoff = if grade < runner_floor - 1 {
                preferred.min(self.base_cuts[i])
            } else if grade < winner_floor + 1 {
                other
            } else {
                top.min(self.base_cuts[i])
            };
        }
        cutoffs
    }

    fn mav_score(sorted: &[f64]) -> f64 {
        let nvot = sorted.len();
        let mid = nvot / 2;
        let base = sorted[mid];
        let hi = mid + sorted[mid..].iter().take_while(|s| **s == base).count();
        let modulated = (mid as f64) * (base + 0.5) / (hi as f64 - 0.5);
        if modulated > base {
            modulated
        } else {
            base - ((base - modulated) / (base + 0.5))
        }
    }

    fn mj_score(sorted: &[f64]) -> f64 {
        let nvot = sorted.len();
        let mid = nvot / 2;
        let base = sorted[mid];
        // Votes equal to the median, from the median up and below it.
        let above = sorted[mid..].iter().take_while(|s| **s == base).count();
        let below = 1 + sorted[..mid].iter().rev().take_while(|s| **s == base).count();
        let n = nvot as f64;
        if above == below {
            base
        } else if above < below {
            base + (above as f64) / n
        } else {
            base - (below as f64) / n
        }
    }

    fn bucklin_score(sorted: &[f64]) -> f64 {
        let nvot = sorted.len();
        let mid = nvot / 2;
        let base = sorted[mid];
        let at_least_median = nvot - sorted.iter().take_while(|s| **s < base).count();
        base + ((at_least_median - mid) as f64) / (nvot as f64)
    }
}

impl Method for GradeMethod {
    fn name(&self) -> &str {
        match self.rule {
            MedianRule::Mav => "Mav",
            MedianRule::Mj => "Mj",
            MedianRule::Bucklin => "Bucklin",
        }
    }

    /// The median grade, moved by a fraction of a grade depending on the votes that tie
    /// the median. For an even number of votes, the upper median is used.
    fn cand_score(&self, votes: &[f64]) -> f64 {
        if votes.is_empty() {
            return 0.0;
        }
        let mut sorted = votes.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        match self.rule {
            MedianRule::Mav => GradeMethod::mav_score(&sorted),
            MedianRule::Mj => GradeMethod::mj_score(&sorted),
            MedianRule::Bucklin => GradeMethod::bucklin_score(&sorted),
        }
    }

    fn honest_ballot(&self, voter: &Voter) -> Ballot {
        let cutoffs = self.honest_cutoffs(voter);
        voter
            .utilities()
            .iter()
            .map(|u| to_vote(&cutoffs, *u))
            .collect()
    }

    fn strategic_ballot(&self, voter: &Voter, poll: &Poll) -> StrategicBallot {
        let utils = voter.utilities();
        let (win_util, runner_util) = (utils[poll.winner], utils[poll.runner_up]);
        if win_util == runner_util {
            let ballot = utils
                .iter()
                .map(|u| if *u >= win_util { TOP_GRADE } else { 0.0 })
                .collect();
            return StrategicBallot {
                ballot,
                used_strategy: None,
            };
        }
        let strat = runner_util > win_util;
        let (preferred, other) = if strat {
            (runner_util, win_util)
        } else {
            (win_util, runner_util)
        };
        let cutoffs = self.strategic_cutoffs(voter, poll, preferred, other);
        StrategicBallot {
            ballot: utils.iter().map(|u| to_vote(&cutoffs, *u)).collect(),
            used_strategy: Some(strat),
        }
    }
}
