use crate::{algo::tabular::QTable, env::Environment};

/// A learner that improves a [`QTable`] by interacting with an environment
pub trait Agent<E>
where
    E: Environment,
{
    /// Run one episode in `env`, learning along the way
    fn go(&mut self, env: &mut E);

    /// The learned action values
    fn table(&self) -> &QTable;
}
