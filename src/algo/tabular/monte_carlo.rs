use log::trace;

use crate::{
    agent::Agent,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    exploration::EpsilonGreedy,
    memory::{Exp, Trajectory},
};

use super::QTable;

/// Configuration for the [`MonteCarloAgent`]
pub struct MonteCarloAgentConfig {
    pub exploration: EpsilonGreedy,
}

impl Default for MonteCarloAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(0.1),
        }
    }
}

/// Every-visit Monte Carlo control
///
/// Plays a whole episode with an epsilon greedy policy, then sets each visited pair to
/// the running mean of the undiscounted returns that followed it. States are explored
/// at random until the end of the first episode that visits them.
pub struct MonteCarloAgent {
    table: QTable,
    exploration: EpsilonGreedy,
    episode: u32,
}

impl MonteCarloAgent {
    /// Initialize a new `MonteCarloAgent` with a table sized for `env`
    pub fn new<E>(env: &E, config: MonteCarloAgentConfig) -> Self
    where
        E: DiscreteActionSpace + DiscreteStateSpace,
    {
        Self {
            table: QTable::new(env.num_states(), env.actions().len()),
            exploration: config.exploration,
            episode: 0,
        }
    }

    /// Number of episodes played so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Update the table from a finished episode
    fn learn<E>(&mut self, env: &E, trajectory: &Trajectory<E::State>)
    where
        E: DiscreteStateSpace,
    {
        for (exp, g) in trajectory.returns() {
            let state = env.state_index(&exp.state);
            self.table.mark_seen(state);
            if env.is_terminal(&exp.state) {
                continue;
            }

            let count = self.table.visit(state, exp.action);
            let q_value = self.table.get(state, exp.action);
            self.table
                .set(state, exp.action, q_value + (g - q_value) / count as f32);
        }
    }
}

impl<E> Agent<E> for MonteCarloAgent
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    E::Action: Copy,
{
    fn go(&mut self, env: &mut E) {
        let actions = env.actions();
        let mut trajectory = Trajectory::new();
        let mut state = env.reset();

        loop {
            let index = env.state_index(&state);
            let action = self
                .exploration
                .select(self.table.seen_values(index), actions.len());
            let (next, reward, done) = env.step(actions[action]);
            trajectory.push(Exp {
                state,
                action,
                reward,
            });
            if done {
                break;
            }
            state = next;
        }

        trace!(
            "monte carlo episode {} took {} steps for {}",
            self.episode,
            trajectory.len(),
            trajectory.total_reward()
        );
        self.learn(env, &trajectory);
        self.episode += 1;
    }

    fn table(&self) -> &QTable {
        &self.table
    }
}
