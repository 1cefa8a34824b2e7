use std::{
    error::Error,
    io::{self, Write},
};

use tracing_subscriber::EnvFilter;
use volcano::cli;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    let config = cli::read_config(&mut input, &mut out)?;
    match cli::choose_algorithm(&mut input, &mut out)? {
        Some(algorithm) => cli::run(algorithm, &config, &mut out)?,
        None => writeln!(out, "Invalid choice. Please choose a valid algorithm.")?,
    }

    Ok(())
}
