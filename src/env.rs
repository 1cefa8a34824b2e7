use std::{
    collections::{btree_map, BTreeMap},
    fmt,
    ops::Index,
};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// whose episodes end in a terminal state or after a step limit.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Whether `state` is absorbing, i.e. has no outgoing action worth learning
    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// An environment with a finite, state independent set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get every action, ordered so that the position of an action is its table index
    ///
    /// The returned vec should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// An environment whose states can be flattened into `0..num_states()`
pub trait DiscreteStateSpace: Environment {
    /// Number of distinct states
    fn num_states(&self) -> usize;

    /// Flattened index of `state`, always less than [`num_states`](Self::num_states)
    fn state_index(&self, state: &Self::State) -> usize;
}

/// Named metrics accumulated by an environment over one episode
#[derive(Debug, Clone, Default)]
pub struct Report {
    keys: Vec<&'static str>,
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    /// Create a report tracking `keys`, all starting at zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        let values = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, values }
    }

    /// The tracked metric names in insertion order
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Entry for updating the metric `key` in place
    pub fn entry(&mut self, key: &'static str) -> btree_map::Entry<'_, &'static str, f64> {
        self.values.entry(key)
    }

    /// Take the current values, leaving every metric at zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.values, fresh)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", key, self[*key])?;
        }
        Ok(())
    }
}
