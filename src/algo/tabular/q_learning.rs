use crate::{
    agent::Agent,
    assert_interval,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    exploration::EpsilonGreedy,
};

use super::QTable;

/// Configuration for the [`QLearningAgent`]
pub struct QLearningAgentConfig {
    pub exploration: EpsilonGreedy,
    pub alpha: f32,
    pub gamma: f32,
}

impl Default for QLearningAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(0.1),
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// A simple Q-learning agent that utilizes a dense Q-table to learn its environment
///
/// A state whose action values are all still zero is explored at random.
pub struct QLearningAgent {
    table: QTable,
    exploration: EpsilonGreedy,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // current episode
}

impl QLearningAgent {
    /// Initialize a new `QLearningAgent` with a table sized for `env`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new<E>(env: &E, config: QLearningAgentConfig) -> Self
    where
        E: DiscreteActionSpace + DiscreteStateSpace,
    {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            table: QTable::new(env.num_states(), env.actions().len()),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
        }
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    fn act(&mut self, state: usize) -> usize {
        let values = (!self.table.is_untouched(state)).then(|| self.table.values(state));
        self.exploration.select(values, self.table.num_actions())
    }

    fn learn(&mut self, state: usize, action: usize, reward: f32, next_state: usize) {
        let q_value = self.table.get(state, action);
        let max_next_q = self.table.max(next_state);
        let new_q_value = reward + self.gamma * max_next_q;
        let weighted_q_value = (1.0 - self.alpha) * q_value + self.alpha * new_q_value;

        self.table.set(state, action, weighted_q_value);
        self.table.visit(state, action);
    }
}

impl<E> Agent<E> for QLearningAgent
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    E::Action: Copy,
{
    fn go(&mut self, env: &mut E) {
        let actions = env.actions();
        let start = env.reset();
        let mut state = env.state_index(&start);

        loop {
            let action = self.act(state);
            let (next, reward, done) = env.step(actions[action]);
            let next_state = env.state_index(&next);
            self.learn(state, action, reward, next_state);
            if done {
                break;
            }
            state = next_state;
        }

        self.episode += 1;
    }

    fn table(&self) -> &QTable {
        &self.table
    }
}
