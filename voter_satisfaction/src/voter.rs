use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};

use crate::config::SimulationErrors;

/// Attributes carried by personality voters.
///
/// They do not take part in any utility arithmetic. They follow a voter through all the
/// voters derived from it, so that clusters can be traced back to their founder.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct VoterTraits {
    pub cluster: u32,
    /// Standard normal scalar, reserved for strategic propensity.
    pub personality: f64,
}

/// A voter: one utility per candidate, aligned with the candidate indices of the electorate.
///
/// Voters are values. Deriving a voter (blending, mutation, negation) always creates a new one.
#[derive(PartialEq, Debug, Clone)]
pub struct Voter {
    utilities: Vec<f64>,
    traits: Option<VoterTraits>,
}

impl Voter {
    pub fn new(utilities: Vec<f64>) -> Voter {
        Voter {
            utilities,
            traits: None,
        }
    }

    /// A voter with standard normal utilities for `ncand` candidates.
    pub fn rand(ncand: usize, rng: &mut dyn RngCore) -> Voter {
        Voter::new(standard_normals(ncand, rng))
    }

    pub fn utilities(&self) -> &[f64] {
        &self.utilities
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }

    pub fn traits(&self) -> Option<VoterTraits> {
        self.traits
    }

    /// The highest utility of this voter, or -inf for a voter without candidates.
    pub fn top(&self) -> f64 {
        self.utilities.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The lowest utility of this voter, or +inf for a voter without candidates.
    pub fn bottom(&self) -> f64 {
        self.utilities.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// A new voter with the given utilities and the same traits as this one.
    pub fn with_utilities(&self, utilities: Vec<f64>) -> Voter {
        Voter {
            utilities,
            traits: self.traits,
        }
    }

    /// Weighted blend of two voters.
    ///
    /// The weight of `self` is always 1 and `weight` is the weight of `other` relative to it:
    /// `u[i] = (self[i] + weight * other[i]) / sqrt(1 + weight^2)`.
    /// The operation is not symmetric. If both voters are independent standard normal, the
    /// result is standard normal too. The result keeps the traits of `self`.
    pub fn hybrid_with(&self, other: &Voter, weight: f64) -> Result<Voter, SimulationErrors> {
        if self.len() != other.len() {
            return Err(SimulationErrors::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(self.with_utilities(blend(&self.utilities, &other.utilities, weight)))
    }

    /// A copy blended with a fresh random voter of relative weight `mutate_weight`.
    pub fn mutant_child(&self, mutate_weight: f64, rng: &mut dyn RngCore) -> Voter {
        let partner = standard_normals(self.len(), rng);
        self.with_utilities(blend(&self.utilities, &partner, mutate_weight))
    }

    /// The voter with all the opposite preferences.
    pub fn negated(&self) -> Voter {
        self.with_utilities(self.utilities.iter().map(|u| -u).collect())
    }
}

// Callers guarantee that both slices have the same length.
fn blend(u1: &[f64], u2: &[f64], weight: f64) -> Vec<f64> {
    let norm = (1.0 + weight * weight).sqrt();
    u1.iter()
        .zip(u2.iter())
        .map(|(a, b)| (a / norm) + (weight * b / norm))
        .collect()
}

fn standard_normals(n: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    (0..n).map(|_| StandardNormal.sample(rng)).collect()
}

/// The flavours of voters that a model can create.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum VoterKind {
    Plain,
    /// Each random voter founds a new cluster and receives a personality.
    Personality,
}

/// Creates the random voters of one generation context.
///
/// The factory owns the cluster counter: two factories never share cluster ids, and
/// a fresh factory always starts at cluster 0.
#[derive(Debug, Clone)]
pub struct VoterFactory {
    kind: VoterKind,
    next_cluster: u32,
}

impl VoterFactory {
    pub fn new(kind: VoterKind) -> VoterFactory {
        VoterFactory {
            kind,
            next_cluster: 0,
        }
    }

    pub fn kind(&self) -> VoterKind {
        self.kind
    }

    /// The number of clusters created so far.
    pub fn clusters(&self) -> u32 {
        self.next_cluster
    }

    pub fn rand_voter(&mut self, ncand: usize, rng: &mut dyn RngCore) -> Voter {
        let mut voter = Voter::rand(ncand, rng);
        if self.kind == VoterKind::Personality {
            voter.traits = Some(VoterTraits {
                cluster: self.next_cluster,
                personality: StandardNormal.sample(rng),
            });
            self.next_cluster += 1;
        }
        voter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn mean_std(xs: &[f64]) -> (f64, f64) {
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    fn rounded(v: &Voter) -> Vec<f64> {
        v.utilities()
            .iter()
            .map(|u| (u * 100000.0).round() / 100000.0)
            .collect()
    }

    #[test]
    fn rand_has_requested_length() {
        let mut rng = make_rng();
        let lens: Vec<usize> = (0..5).map(|i| Voter::rand(i, &mut rng).len()).collect();
        assert_eq!(lens, vec![0, 1, 2, 3, 4]);
        assert!(Voter::rand(0, &mut rng).is_empty());
    }

    #[test]
    fn rand_is_standard_normal() {
        let mut rng = make_rng();
        let v = Voter::rand(1000, &mut rng);
        let (mean, std) = mean_std(v.utilities());
        assert!(-0.3 < mean && mean < 0.3, "mean {}", mean);
        assert!(0.8 < std && std < 1.2, "std {}", std);
    }

    #[test]
    fn hybrid_requires_same_length() {
        let res = Voter::new(vec![1.0, 2.0]).hybrid_with(&Voter::new(vec![1.0, 2.0, 3.0]), 1.0);
        assert_eq!(
            res,
            Err(SimulationErrors::LengthMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn hybrid_weighted_blend() {
        let v = Voter::new(vec![1.0, 2.0, 5.0])
            .hybrid_with(&Voter::new(vec![-0.5, -1.0, 0.0]), 0.75)
            .unwrap();
        assert_eq!(rounded(&v), vec![0.5, 1.0, 4.0]);
    }

    #[test]
    fn hybrid_self_blend() {
        let v2 = Voter::new(vec![1.0, 2.0])
            .hybrid_with(&Voter::new(vec![3.0, 2.0]), 1.0)
            .unwrap();
        let v3 = v2.hybrid_with(&v2, 1.0).unwrap();
        assert_eq!(rounded(&v3), vec![4.0, 4.0]);
    }

    #[test]
    fn hybrid_is_asymmetric() {
        let a = Voter::new(vec![1.0, 0.0]);
        let b = Voter::new(vec![0.0, 1.0]);
        let ab = a.hybrid_with(&b, 2.0).unwrap();
        let ba = b.hybrid_with(&a, 2.0).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn mutant_child_stays_standard_normal() {
        let mut rng = make_rng();
        let mut v = Voter::rand(1000, &mut rng);
        for i in 0..30 {
            v = v.mutant_child((i as f64) / 30.0, &mut rng);
        }
        let (mean, std) = mean_std(v.utilities());
        assert!(-0.3 < mean && mean < 0.3, "mean {}", mean);
        assert!(0.8 < std && std < 1.2, "std {}", std);
    }

    #[test]
    fn personality_voters_get_new_clusters() {
        let mut rng = make_rng();
        let mut factory = VoterFactory::new(VoterKind::Personality);
        let v0 = factory.rand_voter(3, &mut rng);
        let v1 = factory.rand_voter(3, &mut rng);
        assert_eq!(v0.traits().map(|t| t.cluster), Some(0));
        assert_eq!(v1.traits().map(|t| t.cluster), Some(1));
        assert_eq!(factory.clusters(), 2);

        let other = VoterFactory::new(VoterKind::Personality).rand_voter(3, &mut rng);
        assert_eq!(other.traits().map(|t| t.cluster), Some(0));
    }

    #[test]
    fn derived_voters_keep_traits() {
        let mut rng = make_rng();
        let mut factory = VoterFactory::new(VoterKind::Personality);
        let v = factory.rand_voter(4, &mut rng);
        let child = v.mutant_child(0.5, &mut rng);
        assert_eq!(child.traits(), v.traits());
        assert_eq!(v.negated().traits(), v.traits());
        let blend = v.hybrid_with(&Voter::rand(4, &mut rng), 1.0).unwrap();
        assert_eq!(blend.traits(), v.traits());
    }

    #[test]
    fn plain_voters_have_no_traits() {
        let mut rng = make_rng();
        let mut factory = VoterFactory::new(VoterKind::Plain);
        assert_eq!(factory.rand_voter(2, &mut rng).traits(), None);
        assert_eq!(factory.clusters(), 0);
    }
}
