use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::ballot::*;
use crate::config::*;
use crate::electorate::Electorate;
use crate::voter::Voter;

/// Transforms the honest results into the information available to the voters.
pub type Media<'a> = &'a dyn Fn(&[f64]) -> Vec<f64>;

/// The media that reports the honest results as they are.
pub fn identity_media(results: &[f64]) -> Vec<f64> {
    results.to_vec()
}

/// The results of the three elections run on the same electorate.
#[derive(PartialEq, Debug, Clone)]
pub struct MultiResults {
    pub honest: Vec<f64>,
    pub strategic: Vec<f64>,
    pub one_sided: Vec<f64>,
}

/// Finds the index of the highest score.
///
/// Ties are broken uniformly at random among all the tied candidates.
pub fn winner(results: &[f64], rng: &mut dyn RngCore) -> Result<usize, SimulationErrors> {
    let win_score = results.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let winners: Vec<usize> = results
        .iter()
        .enumerate()
        .filter_map(|(cand, score)| if *score == win_score { Some(cand) } else { None })
        .collect();
    if winners.len() > 1 {
        debug!("winner: tiebreak between {:?}", winners);
    }
    winners
        .choose(rng)
        .cloned()
        .ok_or(SimulationErrors::NotEnoughCandidates(results.len()))
}

/// Satisfaction efficiency of electing `winner`, given the social utilities.
///
/// It is 1 for the best candidate for society and 0 for the expected outcome of a uniformly
/// random pick. It is undefined when all the candidates have the same social utility.
pub fn vse(soc_utils: &[f64], winner: usize) -> Option<f64> {
    let best = soc_utils.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let rand = soc_utils.iter().sum::<f64>() / (soc_utils.len() as f64);
    let denom = best - rand;
    if denom.is_finite() && denom > 0.0 {
        soc_utils.get(winner).map(|u| (u - rand) / denom)
    } else {
        warn!("vse: undefined, social utilities are all equal: {:?}", soc_utils);
        None
    }
}

/// An election method: how ballots are cast and how they are counted.
///
/// Implementors provide the scoring of one candidate and the honest and strategic ballots.
/// The rest of the protocol (tabulation, memoization of the ballots, the
/// honest -> poll -> strategic -> one-sided sequence, VSE) is shared.
pub trait Method {
    /// The name of the method, also used to key the memoized ballots.
    fn name(&self) -> &str;

    /// Combines all the votes for one candidate into its score.
    fn cand_score(&self, votes: &[f64]) -> f64;

    fn honest_ballot(&self, voter: &Voter) -> Ballot;

    fn strategic_ballot(&self, voter: &Voter, poll: &Poll) -> StrategicBallot;

    /// Combines ballots into results, one score per candidate.
    fn results(&self, ballots: &[Ballot]) -> Vec<f64> {
        let ncand = ballots.first().map(|b| b.len()).unwrap_or(0);
        (0..ncand)
            .map(|c| {
                let votes: Vec<f64> = ballots.iter().map(|b| b[c]).collect();
                self.cand_score(&votes)
            })
            .collect()
    }

    fn winner(&self, results: &[f64], rng: &mut dyn RngCore) -> Result<usize, SimulationErrors> {
        winner(results, rng)
    }

    /// The strategic ballot maker for the given poll information.
    fn strat_ballot_for(&self, info: &[f64]) -> Result<BallotMaker, SimulationErrors> {
        Ok(BallotMaker::Strategic(Poll::from_results(info)?))
    }

    /// Casts the ballot of one voter and records it in the voter's memo.
    ///
    /// Strategic ballots need the honest ballot of the voter to be recorded first,
    /// and one-sided ballots need both the honest and the strategic ones.
    fn cast_ballot(
        &self,
        voter_id: usize,
        voter: &Voter,
        maker: &BallotMaker,
        ledger: &mut BallotLedger,
    ) -> Result<Ballot, SimulationErrors> {
        let name = self.name();
        let memo = ledger
            .memo_mut(voter_id)
            .ok_or(SimulationErrors::EmptyElectorate)?;
        let missing = |kind: BallotKind| SimulationErrors::MissingBallot {
            method: name.to_string(),
            kind,
            voter: voter_id,
        };
        let entry = match maker {
            BallotMaker::Honest => MemoEntry {
                ballot: self.honest_ballot(voter),
                used_strategy: None,
            },
            BallotMaker::Strategic(poll) => {
                memo.get(name, BallotKind::Honest)
                    .ok_or_else(|| missing(BallotKind::Honest))?;
                let sb = self.strategic_ballot(voter, poll);
                MemoEntry {
                    ballot: sb.ballot,
                    used_strategy: sb.used_strategy,
                }
            }
            BallotMaker::OneSided => {
                let honest = memo
                    .get(name, BallotKind::Honest)
                    .ok_or_else(|| missing(BallotKind::Honest))?;
                let strategic = memo
                    .get(name, BallotKind::Strategic)
                    .ok_or_else(|| missing(BallotKind::Strategic))?;
                let ballot = if strategic.used_strategy.unwrap_or(false) {
                    strategic.ballot.clone()
                } else {
                    honest.ballot.clone()
                };
                MemoEntry {
                    ballot,
                    used_strategy: None,
                }
            }
        };
        let ballot = entry.ballot.clone();
        memo.record(name, maker.kind(), entry);
        Ok(ballot)
    }

    /// Casts the ballots of all the voters and counts them.
    fn results_for(
        &self,
        electorate: &Electorate,
        maker: &BallotMaker,
        ledger: &mut BallotLedger,
    ) -> Result<Vec<f64>, SimulationErrors> {
        if electorate.is_empty() {
            return Err(SimulationErrors::EmptyElectorate);
        }
        let mut ballots: Vec<Ballot> = Vec::with_capacity(electorate.len());
        for (voter_id, voter) in electorate.voters().iter().enumerate() {
            ballots.push(self.cast_ballot(voter_id, voter, maker, ledger)?);
        }
        Ok(self.results(&ballots))
    }

    /// Runs the honest election, then the strategic and one-sided strategic elections
    /// based on the poll information given by `media(honest results)`.
    ///
    /// All the honest ballots are cast before any strategic ballot.
    fn multi_results_with(
        &self,
        electorate: &Electorate,
        media: Media<'_>,
        ledger: &mut BallotLedger,
    ) -> Result<MultiResults, SimulationErrors> {
        let honest = self.results_for(electorate, &BallotMaker::Honest, ledger)?;
        let info = media(&honest);
        if info.len() != electorate.num_candidates() {
            return Err(SimulationErrors::LengthMismatch {
                expected: electorate.num_candidates(),
                found: info.len(),
            });
        }
        let maker = self.strat_ballot_for(&info)?;
        let strategic = self.results_for(electorate, &maker, ledger)?;
        let one_sided = self.results_for(electorate, &BallotMaker::OneSided, ledger)?;
        debug!(
            "{}: honest: {:?} strategic: {:?} one-sided: {:?} ({} strategic voters)",
            self.name(),
            honest,
            strategic,
            one_sided,
            ledger.count_strategic(self.name())
        );
        Ok(MultiResults {
            honest,
            strategic,
            one_sided,
        })
    }

    /// Same as `multi_results_with`, with a fresh ledger for this election.
    fn multi_results(
        &self,
        electorate: &Electorate,
        media: Media<'_>,
    ) -> Result<MultiResults, SimulationErrors> {
        let mut ledger = BallotLedger::new(electorate.len());
        self.multi_results_with(electorate, media, &mut ledger)
    }

    /// The honest, strategic and one-sided VSE of this method on the electorate,
    /// when the poll reports the honest results faithfully.
    fn vse_on(
        &self,
        electorate: &Electorate,
        rng: &mut dyn RngCore,
    ) -> Result<MethodVse, SimulationErrors> {
        self.vse_on_with(electorate, &identity_media, rng)
    }

    fn vse_on_with(
        &self,
        electorate: &Electorate,
        media: Media<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<MethodVse, SimulationErrors> {
        let res = self.multi_results(electorate, media)?;
        let utils = electorate.soc_utils();
        let winners = [
            self.winner(&res.honest, rng)?,
            self.winner(&res.strategic, rng)?,
            self.winner(&res.one_sided, rng)?,
        ];
        Ok(MethodVse {
            method: self.name().to_string(),
            honest: vse(utils, winners[0]),
            strategic: vse(utils, winners[1]),
            one_sided: vse(utils, winners[2]),
            winners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn make_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[test]
    fn winner_unique_maximum() {
        let mut rng = make_rng();
        assert_eq!(winner(&[1.0, 2.0, 3.0, 2.0, -100.0], &mut rng), Ok(2));
    }

    #[test]
    fn winner_breaks_ties_randomly() {
        let mut rng = make_rng();
        let results = [1.0, 2.0, 1.0, 3.0, 3.0, 3.0, 2.0, 1.0, 2.0];
        let mut seen: HashSet<usize> = HashSet::new();
        for _ in 0..200 {
            let w = winner(&results, &mut rng).unwrap();
            assert!((3..6).contains(&w));
            seen.insert(w);
        }
        assert_eq!(seen, [3, 4, 5].into_iter().collect());
    }

    #[test]
    fn winner_of_nothing() {
        let mut rng = make_rng();
        assert_eq!(
            winner(&[], &mut rng),
            Err(SimulationErrors::NotEnoughCandidates(0))
        );
    }

    #[test]
    fn vse_scale() {
        let utils = [0.0, 1.0, 2.0];
        assert_eq!(vse(&utils, 2), Some(1.0));
        assert_eq!(vse(&utils, 1), Some(0.0));
        assert_eq!(vse(&utils, 0), Some(-1.0));
    }

    #[test]
    fn vse_undefined_when_all_equal() {
        assert_eq!(vse(&[0.5, 0.5, 0.5], 1), None);
    }

    #[test]
    fn one_sided_needs_previous_ballots() {
        let e = Electorate::from_utilities(&[vec![1.0, 0.0, -1.0]]).unwrap();
        let mut ledger = BallotLedger::new(e.len());
        let res = Score.results_for(&e, &BallotMaker::OneSided, &mut ledger);
        assert_eq!(
            res,
            Err(SimulationErrors::MissingBallot {
                method: "Score".to_string(),
                kind: BallotKind::Honest,
                voter: 0
            })
        );

        Score
            .results_for(&e, &BallotMaker::Honest, &mut ledger)
            .unwrap();
        let res = Score.results_for(&e, &BallotMaker::OneSided, &mut ledger);
        assert_eq!(
            res,
            Err(SimulationErrors::MissingBallot {
                method: "Score".to_string(),
                kind: BallotKind::Strategic,
                voter: 0
            })
        );
    }

    #[test]
    fn strategic_needs_honest_ballots() {
        let e = Electorate::from_utilities(&[vec![1.0, 0.0, -1.0]]).unwrap();
        let mut ledger = BallotLedger::new(e.len());
        let maker = Score.strat_ballot_for(&[1.0, 2.0, 3.0]).unwrap();
        let res = Score.results_for(&e, &maker, &mut ledger);
        assert!(matches!(res, Err(SimulationErrors::MissingBallot { .. })));
    }

    #[test]
    fn ballots_are_memoized() {
        let e = Electorate::from_utilities(&[vec![1.0, 0.0, -1.0], vec![-1.0, 0.5, 1.0]]).unwrap();
        let mut ledger = BallotLedger::new(e.len());
        Score
            .multi_results_with(&e, &identity_media, &mut ledger)
            .unwrap();
        for voter in 0..2 {
            let memo = ledger.memo(voter).unwrap();
            for kind in [BallotKind::Honest, BallotKind::Strategic, BallotKind::OneSided] {
                assert!(memo.get("Score", kind).is_some(), "{} {}", voter, kind);
            }
            assert!(memo.get("Mav", BallotKind::Honest).is_none());
        }
    }

    #[test]
    fn empty_electorate_is_rejected() {
        let e = Electorate::new(vec![]).unwrap();
        assert_eq!(
            Score.multi_results(&e, &identity_media),
            Err(SimulationErrors::EmptyElectorate)
        );
    }

    #[test]
    fn media_drives_the_frontrunners() {
        // Honest favourite is 0, but the media reports 1 and 2 as the frontrunners.
        let e = Electorate::from_utilities(&[
            vec![1.0, 0.0, -1.0],
            vec![1.0, -1.0, 0.0],
            vec![1.0, 0.5, -0.5],
        ])
        .unwrap();
        let media = |_: &[f64]| vec![0.0, 2.0, 1.0];
        let mut ledger = BallotLedger::new(e.len());
        Score.multi_results_with(&e, &media, &mut ledger).unwrap();
        // Voter 1 prefers the runner-up (2) to the polled winner (1).
        assert!(!ledger.memo(0).unwrap().used_strategy("Score"));
        assert!(ledger.memo(1).unwrap().used_strategy("Score"));
        assert!(!ledger.memo(2).unwrap().used_strategy("Score"));
    }

    #[test]
    fn media_must_report_every_candidate() {
        let e = Electorate::from_utilities(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let mut rng = make_rng();
        let longer = |_: &[f64]| vec![0.0, 1.0, 5.0];
        assert_eq!(
            Score.vse_on_with(&e, &longer, &mut rng),
            Err(SimulationErrors::LengthMismatch {
                expected: 2,
                found: 3
            })
        );
        let shorter = |_: &[f64]| vec![1.0];
        assert_eq!(
            Score.multi_results(&e, &shorter),
            Err(SimulationErrors::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
