/// Represents a single step of an episode as seen by a tabular learner
#[derive(Debug, Clone, PartialEq)]
pub struct Exp<S> {
    /// The state of the environment before taking the action
    pub state: S,
    /// Table index of the action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f32,
}

/// The steps of one episode in the order they were taken
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<S> {
    steps: Vec<Exp<S>>,
}

impl<S> Trajectory<S> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, exp: Exp<S>) {
        self.steps.push(exp);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of every reward in the episode
    pub fn total_reward(&self) -> f32 {
        self.steps.iter().map(|e| e.reward).sum()
    }

    /// Walk the episode backwards, pairing each step with its undiscounted return
    ///
    /// The return of a step is the sum of its reward and every reward after it.
    pub fn returns(&self) -> impl Iterator<Item = (&Exp<S>, f32)> + '_ {
        self.steps.iter().rev().scan(0.0, |g, exp| {
            *g += exp.reward;
            Some((exp, *g))
        })
    }
}

impl<S> Default for Trajectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_mock_trajectory() -> Trajectory<usize> {
        let mut trajectory = Trajectory::new();
        for (state, reward) in [(0, -1.0), (1, -1.0), (2, 10.0)] {
            trajectory.push(Exp {
                state,
                action: 3,
                reward,
            });
        }
        trajectory
    }

    #[test]
    fn returns_accumulate_backwards() {
        let trajectory = create_mock_trajectory();
        let returns: Vec<(usize, f32)> = trajectory.returns().map(|(e, g)| (e.state, g)).collect();
        assert_eq!(returns, [(2, 10.0), (1, 9.0), (0, 8.0)]);
        assert_eq!(trajectory.total_reward(), 8.0);
        assert_eq!(trajectory.len(), 3);
    }

    #[test]
    fn empty_trajectory_has_no_returns() {
        let trajectory = Trajectory::<usize>::default();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.returns().count(), 0);
    }
}
