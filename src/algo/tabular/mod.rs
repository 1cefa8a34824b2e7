mod monte_carlo;
mod q_learning;
mod sarsa;
mod table;

pub use monte_carlo::{MonteCarloAgent, MonteCarloAgentConfig};
pub use q_learning::{QLearningAgent, QLearningAgentConfig};
pub use sarsa::{SarsaAgent, SarsaAgentConfig};
pub use table::QTable;

use crate::env::{DiscreteActionSpace, DiscreteStateSpace};

/// Outcome of following a table greedily for one episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollout {
    pub steps: usize,
    pub reward: f32,
}

/// Follow the greedy action of `table` from a fresh episode until it ends
pub fn greedy_rollout<E>(env: &mut E, table: &QTable) -> Rollout
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    E::Action: Copy,
{
    let actions = env.actions();
    let mut state = env.reset();
    let mut rollout = Rollout {
        steps: 0,
        reward: 0.0,
    };

    loop {
        let action = actions[table.greedy(env.state_index(&state))];
        let (next, reward, done) = env.step(action);
        rollout.steps += 1;
        rollout.reward += reward;
        if done {
            return rollout;
        }
        state = next;
    }
}
