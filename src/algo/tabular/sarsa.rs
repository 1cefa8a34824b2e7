use crate::{
    agent::Agent,
    assert_interval,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    exploration::EpsilonGreedy,
};

use super::QTable;

/// Configuration for the [`SarsaAgent`]
pub struct SarsaAgentConfig {
    pub exploration: EpsilonGreedy,
    pub alpha: f32,
    pub gamma: f32,
}

impl Default for SarsaAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(0.1),
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// On-policy temporal difference control
pub struct SarsaAgent {
    table: QTable,
    exploration: EpsilonGreedy,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
    episode: u32,
}

impl SarsaAgent {
    /// Initialize a new `SarsaAgent` with a table sized for `env`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new<E>(env: &E, config: SarsaAgentConfig) -> Self
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

    /// Choose an action based on the current state and exploration policy
    fn act(&mut self, state: usize) -> usize {
        let num_actions = self.table.num_actions();
        self.exploration
            .select(self.table.seen_values(state), num_actions)
    }

    fn learn(
        &mut self,
        state: usize,
        action: usize,
        reward: f32,
        next_state: usize,
        next_action: usize,
    ) {
        let q_value = self.table.get(state, action);
        let next_q_value = self.table.get(next_state, next_action);
        let update = q_value + self.alpha * (reward + self.gamma * next_q_value - q_value);
        self.table.set(state, action, update);
        self.table.visit(state, action);
        self.table.mark_seen(state);
        self.table.mark_seen(next_state);
    }
}

impl<E> Agent<E> for SarsaAgent
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    E::Action: Copy,
{
    fn go(&mut self, env: &mut E) {
        let actions = env.actions();
        let start = env.reset();
        let mut state = env.state_index(&start);
        let mut action = self.act(state);

        loop {
            let (next, reward, done) = env.step(actions[action]);
            let next_state = env.state_index(&next);
            let next_action = self.act(next_state);

            self.learn(state, action, reward, next_state, next_action);
            if done {
                break;
            }
            (state, action) = (next_state, next_action);
        }

        self.episode += 1;
    }

    fn table(&self) -> &QTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        algo::tabular::{greedy_rollout, tests::calm_volcano, Rollout},
        env::tests::MockEnv,
    };

    use super::*;

    fn config(epsilon: f32) -> SarsaAgentConfig {
        SarsaAgentConfig {
            exploration: EpsilonGreedy::new(epsilon).with_seed(3),
            ..Default::default()
        }
    }

    #[test]
    fn zero_episodes_leave_table_empty() {
        let env = calm_volcano();
        let agent = SarsaAgent::new(&env, config(0.1));
        assert_eq!(agent.table(), &QTable::new(16, 4));
        assert_eq!(agent.table().seen_states().count(), 0);
    }

    #[test]
    fn td_update_functional() {
        let mut env = MockEnv::new();
        let mut agent = SarsaAgent::new(&env, config(0.0));

        agent.go(&mut env);
        assert!((agent.table().get(0, 0) - 0.1).abs() < 1e-6);
        assert!((agent.table().get(1, 0) - 0.2).abs() < 1e-6);

        agent.go(&mut env);
        // 0.1 + 0.1 * (1 + 0.9 * 0.2 - 0.1)
        assert!((agent.table().get(0, 0) - 0.208).abs() < 1e-6);
        assert_eq!(agent.table().count(0, 0), 2);
        assert!(agent.table().is_seen(2), "Next states are seen");
        assert_eq!(agent.episode(), 2);
    }

    #[test]
    fn learns_shortest_crossing() {
        let mut env = calm_volcano();
        let mut agent = SarsaAgent::new(&env, config(0.1));
        for _ in 0..2000 {
            agent.go(&mut env);
        }
        assert_eq!(
            greedy_rollout(&mut env, agent.table()),
            Rollout {
                steps: 6,
                reward: 5.0
            }
        );
    }

    #[test]
    #[should_panic(expected = "Invalid value for `config.alpha`")]
    fn rejects_bad_alpha() {
        let env = MockEnv::new();
        SarsaAgent::new(
            &env,
            SarsaAgentConfig {
                alpha: 2.0,
                ..config(0.1)
            },
        );
    }
}
