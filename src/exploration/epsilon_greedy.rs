use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::assert_interval;

use super::Choice;

/// Epsilon greedy exploration policy with a fixed epsilon threshold
///
/// The policy owns its random source so that a run can be reproduced by seeding it
/// with [`with_seed`](Self::with_seed).
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f32,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy seeded from system entropy
    ///
    /// **Panics** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f32) -> Self {
        assert_interval!(epsilon, 0.0, 1.0);
        Self {
            epsilon,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source with one seeded from `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Roll against epsilon
    pub fn choose(&mut self) -> Choice {
        if self.rng.gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select an action index for a state
    ///
    /// `values` holds the state's action values, or `None` if the state has not been
    /// seen yet. Unseen states are always explored.
    pub fn select(&mut self, values: Option<&[f32]>, num_actions: usize) -> usize {
        match (self.choose(), values) {
            (Choice::Exploit, Some(values)) => greedy(values),
            _ => self.rng.gen_range(0..num_actions),
        }
    }
}

/// Index of the highest value, ties resolving to the lowest index
pub fn greedy(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_breaks_ties_low() {
        assert_eq!(greedy(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(greedy(&[-1.0, 2.0, 2.0, 1.0]), 1);
        assert_eq!(greedy(&[-3.0, -2.0, -5.0, -2.0]), 1);
    }

    #[test]
    fn zero_epsilon_exploits() {
        let mut policy = EpsilonGreedy::new(0.0).with_seed(7);
        for _ in 0..100 {
            assert_eq!(policy.choose(), Choice::Exploit);
            assert_eq!(policy.select(Some(&[0.0, 1.0, 3.0, 3.0]), 4), 2);
        }
    }

    #[test]
    fn full_epsilon_explores() {
        let mut policy = EpsilonGreedy::new(1.0).with_seed(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            assert_eq!(policy.choose(), Choice::Explore);
            seen[policy.select(Some(&[9.0, 0.0, 0.0, 0.0]), 4)] = true;
        }
        assert!(seen.iter().all(|&s| s), "Every action is drawn");
    }

    #[test]
    fn unseen_state_explores() {
        let mut policy = EpsilonGreedy::new(0.0).with_seed(3);
        let actions: Vec<usize> = (0..200).map(|_| policy.select(None, 4)).collect();
        assert!(actions.iter().all(|&a| a < 4));
        assert!(actions.iter().any(|&a| a != 0), "Unseen states are not greedy");
    }

    #[test]
    fn seeded_policies_agree() {
        let mut a = EpsilonGreedy::new(0.5).with_seed(11);
        let mut b = EpsilonGreedy::new(0.5).with_seed(11);
        for _ in 0..50 {
            assert_eq!(a.select(None, 4), b.select(None, 4));
        }
    }

    #[test]
    #[should_panic(expected = "Invalid value for `epsilon`")]
    fn rejects_bad_epsilon() {
        EpsilonGreedy::new(1.5);
    }
}
