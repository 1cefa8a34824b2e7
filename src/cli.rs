//! Console front end: prompts for a run configuration, trains the chosen learner and
//! prints its table.

use std::{
    error::Error,
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use log::{debug, info};
use strum::EnumString;

use crate::{
    agent::Agent,
    algo::tabular::{
        MonteCarloAgent, MonteCarloAgentConfig, QLearningAgent, QLearningAgentConfig, QTable,
        SarsaAgent, SarsaAgentConfig,
    },
    env::DiscreteStateSpace,
    exploration::EpsilonGreedy,
    gym::{VolcanoConfig, VolcanoCrossing},
};

/// The learners selectable from the console by a single letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Algorithm {
    #[strum(serialize = "m")]
    MonteCarlo,
    #[strum(serialize = "s")]
    Sarsa,
    #[strum(serialize = "q")]
    QLearning,
}

impl Algorithm {
    /// Human readable name, never accepted as a selection
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::MonteCarlo => "Monte Carlo",
            Algorithm::Sarsa => "SARSA",
            Algorithm::QLearning => "Q-learning",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answers to the console prompts
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub episodes: u32,
    pub slip_probabilities: Vec<f64>,
    /// `(rows, cols)`
    pub grid_size: (usize, usize),
    pub epsilon: f32,
    /// Seeds the volcano and the exploration policy, entropy when `None`
    pub seed: Option<u64>,
}

/// Parse a comma separated list
pub fn parse_list<T: FromStr>(input: &str) -> Result<Vec<T>, T::Err> {
    input.split(',').map(|x| x.trim().parse()).collect()
}

/// Parse `rows,cols`
pub fn parse_grid_size(input: &str) -> Result<(usize, usize), Box<dyn Error>> {
    match parse_list::<usize>(input)?.as_slice() {
        &[rows, cols] => Ok((rows, cols)),
        _ => Err(format!("expected two grid dimensions, got `{}`", input.trim()).into()),
    }
}

/// Reject probabilities outside of `[0,1]` instead of letting them panic later
fn check_probability(name: &str, value: f64) -> Result<(), Box<dyn Error>> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be in the interval [0, 1], got {value}").into())
    }
}

/// Print `message` and read one line of input
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<String> {
    write!(output, "{message}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask for the episode count, slip probabilities, grid size and epsilon, in that order
///
/// Malformed numbers and probabilities outside of `[0,1]` are returned as errors, nothing
/// is retried.
pub fn read_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<RunConfig, Box<dyn Error>> {
    let episodes: u32 = prompt(input, output, "Enter the number of episodes: ")?.parse()?;
    let slip_probabilities: Vec<f64> =
        parse_list(&prompt(input, output, "Enter slip probabilities (comma-separated): ")?)?;
    for &p in &slip_probabilities {
        check_probability("slip probability", p)?;
    }
    let grid_size = parse_grid_size(&prompt(
        input,
        output,
        "Enter grid size (comma-separated, e.g., 4,4): ",
    )?)?;
    let epsilon: f32 = prompt(input, output, "Enter epsilon value: ")?.parse()?;
    check_probability("epsilon", f64::from(epsilon))?;

    Ok(RunConfig {
        episodes,
        slip_probabilities,
        grid_size,
        epsilon,
        seed: None,
    })
}

/// Ask for the learner, `None` if the answer names none of them
pub fn choose_algorithm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<Algorithm>> {
    let answer = prompt(
        input,
        output,
        "Choose the reinforcement learning algorithm (s for SARSA, m for Monte Carlo, q for Q-learning): ",
    )?;
    Ok(answer.parse().ok())
}

/// Train `algorithm` once per slip probability and print each resulting table
pub fn run<W: Write>(algorithm: Algorithm, config: &RunConfig, out: &mut W) -> io::Result<()> {
    for &slip_probability in &config.slip_probabilities {
        let mut env = VolcanoCrossing::new(VolcanoConfig {
            grid_size: config.grid_size,
            slip_probability,
            seed: config.seed,
            ..Default::default()
        });
        let mut exploration = EpsilonGreedy::new(config.epsilon);
        if let Some(seed) = config.seed {
            exploration = exploration.with_seed(seed.wrapping_add(1));
        }

        writeln!(
            out,
            "\nResults for Slip Probability = {} and Epsilon = {}:\n",
            slip_probability, config.epsilon
        )?;

        match algorithm {
            Algorithm::MonteCarlo => {
                let mut agent = MonteCarloAgent::new(&env, MonteCarloAgentConfig { exploration });
                train(algorithm, &mut agent, &mut env, config.episodes);
                print_monte_carlo(&env, agent.table(), out)?;
            }
            Algorithm::Sarsa => {
                let mut agent = SarsaAgent::new(
                    &env,
                    SarsaAgentConfig {
                        exploration,
                        ..Default::default()
                    },
                );
                train(algorithm, &mut agent, &mut env, config.episodes);
                print_sarsa(&env, agent.table(), out)?;
            }
            Algorithm::QLearning => {
                let mut agent = QLearningAgent::new(
                    &env,
                    QLearningAgentConfig {
                        exploration,
                        ..Default::default()
                    },
                );
                train(algorithm, &mut agent, &mut env, config.episodes);
                print_q_learning(&env, agent.table(), out)?;
            }
        }
    }

    Ok(())
}

fn train<A: Agent<VolcanoCrossing>>(
    algorithm: Algorithm,
    agent: &mut A,
    env: &mut VolcanoCrossing,
    episodes: u32,
) {
    let mut total_reward = 0.0;
    let mut goals = 0;
    for i in 0..episodes {
        agent.go(env);
        debug!("episode {i}: {}", env.report);
        let report = env.report.take();
        total_reward += report["reward"];
        if report["goal"] > 0.0 {
            goals += 1;
        }
    }

    if episodes > 0 {
        info!(
            "{algorithm} finished {episodes} episodes, mean reward {:.2}, goal reached {goals} times",
            total_reward / f64::from(episodes)
        );
    }
}

fn print_monte_carlo<W: Write>(
    env: &VolcanoCrossing,
    table: &QTable,
    out: &mut W,
) -> io::Result<()> {
    for state in table.seen_states() {
        for (action, q_value) in table.values(state).iter().enumerate() {
            writeln!(
                out,
                "State: {:?}, Action: {}, Q-Value: {}",
                env.position(state),
                action,
                q_value
            )?;
        }
    }

    writeln!(out, "\nAverage Utility:")?;
    for state in table.seen_states() {
        for action in 0..table.num_actions() {
            writeln!(
                out,
                "State: {:?}, Action: {}, Average Utility: {}",
                env.position(state),
                action,
                table.average_utility(state, action)
            )?;
        }
    }
    Ok(())
}

fn print_sarsa<W: Write>(env: &VolcanoCrossing, table: &QTable, out: &mut W) -> io::Result<()> {
    for state in 0..env.num_states() {
        for (action, q_value) in table.values(state).iter().enumerate() {
            writeln!(
                out,
                "State: {:?}, Action: {}, Q-Value: {}",
                env.position(state),
                action,
                q_value
            )?;
        }
    }
    Ok(())
}

fn print_q_learning<W: Write>(
    env: &VolcanoCrossing,
    table: &QTable,
    out: &mut W,
) -> io::Result<()> {
    for state in 0..env.num_states() {
        for (action, q_value) in table.values(state).iter().enumerate() {
            writeln!(
                out,
                "State: {}, Action: {}, Q-Value: {}, Average Utility: {}",
                state,
                action,
                q_value,
                table.average_utility(state, action)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run_config(episodes: u32, slip_probabilities: Vec<f64>) -> RunConfig {
        RunConfig {
            episodes,
            slip_probabilities,
            grid_size: (3, 3),
            epsilon: 0.2,
            seed: Some(21),
        }
    }

    fn output_of(algorithm: Algorithm, config: &RunConfig) -> String {
        let mut out = Vec::new();
        run(algorithm, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_lists() {
        assert_eq!(parse_list::<f64>("0.1, 0.5,1").unwrap(), [0.1, 0.5, 1.0]);
        assert!(parse_list::<f64>("0.1,x").is_err());
        assert_eq!(parse_grid_size("4,5").unwrap(), (4, 5));
        assert!(parse_grid_size("4").is_err());
        assert!(parse_grid_size("4,5,6").is_err());
        assert!(parse_grid_size("four,4").is_err());
    }

    #[test]
    fn algorithm_letters() {
        assert_eq!("m".parse::<Algorithm>().unwrap(), Algorithm::MonteCarlo);
        assert_eq!("S".parse::<Algorithm>().unwrap(), Algorithm::Sarsa);
        assert_eq!("q".parse::<Algorithm>().unwrap(), Algorithm::QLearning);
        assert!("x".parse::<Algorithm>().is_err());
        for name in ["sarsa", "SARSA", "monte carlo", "Monte Carlo", "q-learning"] {
            assert!(name.parse::<Algorithm>().is_err(), "`{name}` is not a letter");
        }
        assert_eq!(Algorithm::QLearning.to_string(), "Q-learning");
    }

    #[test]
    fn reads_prompts_in_order() {
        let mut input = Cursor::new("100\n0.1,0.3\n4,6\n0.25\nq\n");
        let mut output = Vec::new();
        let config = read_config(&mut input, &mut output).unwrap();
        assert_eq!(
            config,
            RunConfig {
                episodes: 100,
                slip_probabilities: vec![0.1, 0.3],
                grid_size: (4, 6),
                epsilon: 0.25,
                seed: None,
            }
        );
        assert_eq!(
            choose_algorithm(&mut input, &mut output).unwrap(),
            Some(Algorithm::QLearning)
        );
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.starts_with("Enter the number of episodes: "));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let mut output = Vec::new();
        assert!(read_config(&mut Cursor::new("ten\n"), &mut output).is_err());
        assert!(read_config(&mut Cursor::new("10\n0.1\n4,4\nhigh\n"), &mut output).is_err());
    }

    #[test]
    fn out_of_range_probabilities_are_errors() {
        let mut output = Vec::new();
        let err = read_config(&mut Cursor::new("10\n0.1,1.5\n4,4\n0.1\n"), &mut output)
            .unwrap_err();
        assert!(err.to_string().contains("slip probability"), "{err}");
        let err = read_config(&mut Cursor::new("10\n0.1\n4,4\n-0.2\n"), &mut output)
            .unwrap_err();
        assert!(err.to_string().contains("epsilon"), "{err}");
        assert!(read_config(&mut Cursor::new("10\n0,1\n4,4\n1\n"), &mut output).is_ok());
    }

    #[test]
    fn unknown_algorithm_is_none() {
        let mut output = Vec::new();
        for answer in ["z\n", "sarsa\n", "monte carlo\n"] {
            assert_eq!(
                choose_algorithm(&mut Cursor::new(answer), &mut output).unwrap(),
                None
            );
        }
    }

    #[test]
    fn sarsa_prints_every_pair() {
        let text = output_of(Algorithm::Sarsa, &run_config(20, vec![0.0]));
        assert!(text.contains("Results for Slip Probability = 0 and Epsilon = 0.2:"));
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("State: ")).collect();
        assert_eq!(lines.len(), 9 * 4);
        assert!(lines[0].starts_with("State: (0, 0), Action: 0, Q-Value: "));
    }

    #[test]
    fn q_learning_prints_average_utility() {
        let text = output_of(Algorithm::QLearning, &run_config(20, vec![0.0]));
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("State: ")).collect();
        assert_eq!(lines.len(), 9 * 4);
        assert!(lines[35].starts_with("State: 8, Action: 3, Q-Value: 0, Average Utility: 0"));
    }

    #[test]
    fn monte_carlo_without_episodes_prints_no_states() {
        let text = output_of(Algorithm::MonteCarlo, &run_config(0, vec![0.0, 0.5]));
        assert_eq!(text.matches("Results for Slip Probability").count(), 2);
        assert_eq!(text.matches("Average Utility:").count(), 2);
        assert!(!text.contains("State: "));
    }

    #[test]
    fn monte_carlo_prints_seen_states() {
        let text = output_of(Algorithm::MonteCarlo, &run_config(5, vec![0.2]));
        assert!(text.contains("State: (0, 0), Action: 0, Q-Value: "));
        assert!(text.contains("State: (0, 0), Action: 0, Average Utility: "));
        assert!(!text.contains("State: (2, 2)"), "Goal is never a visited state");
    }
}
