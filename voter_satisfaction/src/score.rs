use crate::ballot::*;
use crate::method::Method;
use crate::voter::Voter;

/// Score voting, 0-10.
///
/// A candidate's score is the mean of its votes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Score;

impl Score {
    pub const MAX_SCORE: f64 = 10.0;

    // Slightly above the top of the scale, so that floor() reaches the top for the favourite.
    const STRETCH: f64 = Score::MAX_SCORE + 0.99;

    /// Rescales `util` from [bottom, top] into 0..=10.
    fn rescale(util: f64, bottom: f64, top: f64) -> f64 {
        (Score::STRETCH * (util - bottom) / (top - bottom)).floor()
    }
}

impl Method for Score {
    fn name(&self) -> &str {
        "Score"
    }

    fn cand_score(&self, votes: &[f64]) -> f64 {
        if votes.is_empty() {
            return 0.0;
        }
        votes.iter().sum::<f64>() / (votes.len() as f64)
    }

    /// Each voter scales its own utilities: the least liked candidate gets 0,
    /// the favourite gets 10.
    fn honest_ballot(&self, voter: &Voter) -> Ballot {
        let bot = voter.bottom();
        let top = voter.top();
        if top <= bot {
            // No preference at all.
            return vec![0.0; voter.len()];
        }
        voter
            .utilities()
            .iter()
            .map(|u| Score::rescale(*u, bot, top))
            .collect()
    }

    /// Scales the utilities between the two frontrunners only: 10 for the preferred
    /// frontrunner and above, 0 for the other one and below.
    fn strategic_ballot(&self, voter: &Voter, poll: &Poll) -> StrategicBallot {
        let utils = voter.utilities();
        let (win_util, runner_util) = (utils[poll.winner], utils[poll.runner_up]);
        if win_util == runner_util {
            let ballot = utils
                .iter()
                .map(|u| if *u >= win_util { Score::MAX_SCORE } else { 0.0 })
                .collect();
            return StrategicBallot {
                ballot,
                used_strategy: None,
            };
        }
        // The runner-up is preferred: be strategic. Otherwise, be complacent.
        let strat = runner_util > win_util;
        let (top, bottom) = if strat {
            (runner_util, win_util)
        } else {
            (win_util, runner_util)
        };
        let ballot = utils
            .iter()
            .map(|u| Score::rescale(*u, bottom, top).clamp(0.0, Score::MAX_SCORE))
            .collect();
        StrategicBallot {
            ballot,
            used_strategy: Some(strat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BallotKind;
    use crate::electorate::Electorate;
    use crate::method::identity_media;
    use crate::BallotLedger;

    fn poll(winner: usize, runner_up: usize) -> Poll {
        Poll {
            winner,
            runner_up,
            winner_score: 7.0,
            runner_up_score: 5.0,
        }
    }

    #[test]
    fn cand_score_is_mean() {
        assert_eq!(Score.cand_score(&[0.0, 10.0, 5.0, 5.0]), 5.0);
        assert_eq!(Score.cand_score(&[]), 0.0);
    }

    #[test]
    fn honest_ballot_uses_own_scale() {
        let v = Voter::new(vec![-1.0, 0.0, 1.0, 0.5]);
        assert_eq!(Score.honest_ballot(&v), vec![0.0, 5.0, 10.0, 8.0]);
        let flat = Voter::new(vec![0.3, 0.3]);
        assert_eq!(Score.honest_ballot(&flat), vec![0.0, 0.0]);
    }

    #[test]
    fn strategic_ballot_complacent() {
        let v = Voter::new(vec![1.0, 0.0, 2.0, -1.0]);
        let sb = Score.strategic_ballot(&v, &poll(0, 1));
        assert_eq!(sb.used_strategy, Some(false));
        assert_eq!(sb.ballot, vec![10.0, 0.0, 10.0, 0.0]);
    }

    #[test]
    fn strategic_ballot_compromise() {
        let v = Voter::new(vec![0.0, 1.0, 0.5, 2.0]);
        let sb = Score.strategic_ballot(&v, &poll(0, 1));
        assert_eq!(sb.used_strategy, Some(true));
        assert_eq!(sb.ballot, vec![0.0, 10.0, 5.0, 10.0]);
    }

    #[test]
    fn strategic_ballot_tied_frontrunners() {
        let v = Voter::new(vec![0.5, 0.5, 1.0, 0.0]);
        let sb = Score.strategic_ballot(&v, &poll(0, 1));
        assert_eq!(sb.used_strategy, None);
        assert_eq!(sb.ballot, vec![10.0, 10.0, 10.0, 0.0]);
    }

    #[test]
    fn one_sided_follows_strategy_flag() {
        let e = Electorate::from_utilities(&[
            vec![1.0, 0.0, -1.0],
            vec![1.0, 0.0, -1.0],
            vec![-1.0, 0.0, 1.0],
        ])
        .unwrap();
        let mut ledger = BallotLedger::new(e.len());
        let res = Score
            .multi_results_with(&e, &identity_media, &mut ledger)
            .unwrap();
        assert_eq!(res.honest, vec![20.0 / 3.0, 5.0, 10.0 / 3.0]);
        // Frontrunners: 0 then 1. The last voter prefers 1 and buries 0.
        let last = ledger.memo(2).unwrap();
        assert!(last.used_strategy("Score"));
        assert_eq!(
            last.get("Score", BallotKind::OneSided).unwrap().ballot,
            vec![0.0, 10.0, 10.0]
        );
        let first = ledger.memo(0).unwrap();
        assert_eq!(
            first.get("Score", BallotKind::OneSided).unwrap().ballot,
            first.get("Score", BallotKind::Honest).unwrap().ballot
        );
    }
}
