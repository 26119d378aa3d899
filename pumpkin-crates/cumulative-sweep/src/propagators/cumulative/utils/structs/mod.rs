mod parameters;
mod task;

pub(crate) use parameters::CumulativeSweepParameters;
pub use task::ArgTask;
pub(crate) use task::Task;
