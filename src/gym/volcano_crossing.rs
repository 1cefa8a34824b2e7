use std::fmt;

use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::VariantArray;

use crate::{
    assert_interval,
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment, Report},
};

/// Grid coordinates as `(row, col)`
pub type Pos = (usize, usize);

const STEP_REWARD: f32 = -1.0;
const CRATER_REWARD: f32 = -10.0;
const GOAL_REWARD: f32 = 10.0;

/// A square of the volcano, its discriminant is the code shown by [`VolcanoCrossing::render`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum Cell {
    Crater = -20,
    Ordinary = 0,
    Start = 1,
    Goal = 2,
}

impl Cell {
    pub fn code(self) -> i8 {
        self as i8
    }
}

#[derive(VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// `(row, col)` offset of the move
    fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}

/// Configuration for the [`VolcanoCrossing`]
#[derive(Debug, Clone, PartialEq)]
pub struct VolcanoConfig {
    /// `(rows, cols)`
    pub grid_size: (usize, usize),
    pub start: Pos,
    /// Defaults to the bottom right corner when `None`
    pub goal: Option<Pos>,
    /// Chance of each cell other than start and goal being a crater
    pub crater_prob: f64,
    /// Chance of an action being replaced by a uniformly random one
    pub slip_probability: f64,
    /// Seed for crater placement and slips, drawn from entropy when `None`
    pub seed: Option<u64>,
}

impl Default for VolcanoConfig {
    fn default() -> Self {
        Self {
            grid_size: (4, 4),
            start: (0, 0),
            goal: None,
            crater_prob: 0.2,
            slip_probability: 0.0,
            seed: None,
        }
    }
}

/// A gridworld where the agent walks from the start to the goal across a volcano
///
/// Every move costs 1, walking into a crater costs 10 and ends the episode, reaching the
/// goal pays 10. Moves off the edge of the grid leave the agent in place and still cost 1.
/// Episodes are cut off after `rows * cols` steps.
pub struct VolcanoCrossing {
    grid: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
    start: Pos,
    goal: Pos,
    slip_probability: f64,
    state: Pos,
    steps: usize,
    rng: StdRng,
    pub report: Report,
}

impl VolcanoCrossing {
    /// Generate a new volcano
    ///
    /// **Panics** if the grid is empty, if `start` or `goal` lie outside of it, or if
    /// `crater_prob` or `slip_probability` is not in the interval `[0,1]`
    pub fn new(config: VolcanoConfig) -> Self {
        let VolcanoConfig {
            grid_size: (rows, cols),
            start,
            goal,
            crater_prob,
            slip_probability,
            seed,
        } = config;
        assert!(rows > 0 && cols > 0, "Grid must have at least one cell.");
        assert_interval!(crater_prob, 0.0, 1.0);
        assert_interval!(slip_probability, 0.0, 1.0);

        let goal = goal.unwrap_or((rows - 1, cols - 1));
        assert!(start.0 < rows && start.1 < cols, "Start {start:?} is off the grid.");
        assert!(goal.0 < rows && goal.1 < cols, "Goal {goal:?} is off the grid.");

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut grid = vec![vec![Cell::Ordinary; cols]; rows];
        grid[start.0][start.1] = Cell::Start;
        grid[goal.0][goal.1] = Cell::Goal;
        for (i, row) in grid.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if (i, j) != start && (i, j) != goal && rng.gen_bool(crater_prob) {
                    *cell = Cell::Crater;
                }
            }
        }

        let craters = grid.iter().flatten().filter(|&&c| c == Cell::Crater).count();
        debug!("generated {rows}x{cols} volcano with {craters} craters, goal at {goal:?}");

        Self {
            grid,
            rows,
            cols,
            start,
            goal,
            slip_probability,
            state: start,
            steps: 0,
            rng,
            report: Report::new(vec!["reward", "steps", "goal"]),
        }
    }

    /// `(rows, cols)`
    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    /// The cell at `pos`, or `None` if it is off the grid
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.grid.get(pos.0).and_then(|row| row.get(pos.1)).copied()
    }

    /// Inverse of [`state_index`](DiscreteStateSpace::state_index)
    pub fn position(&self, index: usize) -> Pos {
        (index / self.cols, index % self.cols)
    }

    /// Print the grid of cell codes
    pub fn render(&self) {
        print!("{self}");
    }

    fn slip(&mut self, action: Action) -> Action {
        if self.slip_probability > 0.0 && self.rng.gen_bool(self.slip_probability) {
            let slipped = Action::VARIANTS[self.rng.gen_range(0..Action::VARIANTS.len())];
            trace!("slipped from {action:?} to {slipped:?}");
            slipped
        } else {
            action
        }
    }

    /// The cell reached by moving from the current state, `None` if it is off the grid
    fn target(&self, action: Action) -> Option<Pos> {
        let (dr, dc) = action.delta();
        let row = self.state.0.checked_add_signed(dr)?;
        let col = self.state.1.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some((row, col))
    }
}

impl Environment for VolcanoCrossing {
    type State = Pos;
    type Action = Action;

    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool) {
        let action = self.slip(action);
        let target = self.target(action);
        self.steps += 1;

        let (reward, mut done) = match target {
            Some(next) => {
                self.state = next;
                match self.grid[next.0][next.1] {
                    Cell::Crater => (CRATER_REWARD, true),
                    Cell::Goal => (GOAL_REWARD, true),
                    Cell::Start | Cell::Ordinary => (STEP_REWARD, false),
                }
            }
            None => (STEP_REWARD, false),
        };

        if self.steps >= self.rows * self.cols || self.is_terminal(&self.state) {
            done = true;
        }

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report
            .entry("reward")
            .and_modify(|x| *x += f64::from(reward));
        if self.state == self.goal {
            self.report.entry("goal").and_modify(|x| *x = 1.0);
        }

        (self.state, reward, done)
    }

    fn reset(&mut self) -> Self::State {
        self.state = self.start;
        self.steps = 0;
        self.state
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        *state == self.goal
    }
}

impl DiscreteActionSpace for VolcanoCrossing {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl DiscreteStateSpace for VolcanoCrossing {
    fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    fn state_index(&self, state: &Self::State) -> usize {
        state.0 * self.cols + state.1
    }
}

impl fmt::Display for VolcanoCrossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let codes: Vec<String> = row.iter().map(|c| format!("{:>3}", c.code())).collect();
            writeln!(f, "[{}]", codes.join(" "))?;
        }
        Ok(())
    }
}
