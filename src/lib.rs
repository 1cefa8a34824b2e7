/// Learner contract
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Console driver
pub mod cli;

/// Environment
pub mod env;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Episode records
pub mod memory;

mod util;
