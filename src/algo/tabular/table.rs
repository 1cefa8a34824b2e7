use crate::exploration::greedy;

/// A dense action-value table over flattened states
///
/// Alongside each value it keeps how many times the pair was updated, and for each state
/// whether a learner has touched it yet.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    num_actions: usize,
    values: Vec<f32>,
    counts: Vec<u32>,
    seen: Vec<bool>,
}

impl QTable {
    /// A zeroed table for `num_states` states with `num_actions` actions each
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        assert!(num_actions > 0, "There must be at least one action.");
        Self {
            num_actions,
            values: vec![0.0; num_states * num_actions],
            counts: vec![0; num_states * num_actions],
            seen: vec![false; num_states],
        }
    }

    pub fn num_states(&self) -> usize {
        self.seen.len()
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn idx(&self, state: usize, action: usize) -> usize {
        debug_assert!(action < self.num_actions);
        state * self.num_actions + action
    }

    /// Action values of `state`
    pub fn values(&self, state: usize) -> &[f32] {
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    /// Action values of `state`, or `None` if no learner has touched it
    pub fn seen_values(&self, state: usize) -> Option<&[f32]> {
        self.seen[state].then(|| self.values(state))
    }

    pub fn get(&self, state: usize, action: usize) -> f32 {
        self.values[self.idx(state, action)]
    }

    pub fn set(&mut self, state: usize, action: usize, value: f32) {
        let i = self.idx(state, action);
        self.values[i] = value;
    }

    pub fn count(&self, state: usize, action: usize) -> u32 {
        self.counts[self.idx(state, action)]
    }

    /// Count a visit to the pair, returning the new count
    pub fn visit(&mut self, state: usize, action: usize) -> u32 {
        let i = self.idx(state, action);
        self.counts[i] += 1;
        self.counts[i]
    }

    pub fn mark_seen(&mut self, state: usize) {
        self.seen[state] = true;
    }

    pub fn is_seen(&self, state: usize) -> bool {
        self.seen[state]
    }

    /// Seen states in index order
    pub fn seen_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.seen
            .iter()
            .enumerate()
            .filter_map(|(s, &seen)| seen.then_some(s))
    }

    /// Whether every action value of `state` is still zero
    pub fn is_untouched(&self, state: usize) -> bool {
        self.values(state).iter().all(|&v| v == 0.0)
    }

    /// Highest action value of `state`
    pub fn max(&self, state: usize) -> f32 {
        self.values(state)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Greedy action of `state`, ties resolving to the lowest index
    pub fn greedy(&self, state: usize) -> usize {
        greedy(self.values(state))
    }

    /// Value of the pair weighted by how often it was updated
    pub fn average_utility(&self, state: usize, action: usize) -> f32 {
        self.get(state, action) * self.count(state, action) as f32
    }
}
