/// The options provided to the cumulative sweep constraint.
#[derive(Debug, Copy, Clone)]
pub struct CumulativeSweepOptions {
    /// The method which is used for filtering the start and end times of the tasks. The default
    /// is the sweep.
    pub propagation_method: CumulativeSweepPropagationMethod,
    /// Determines whether the energy of the tasks is compared to the available capacity before
    /// filtering.
    pub use_energy_reasoning: bool,
    /// Determines whether only the tasks around the changed tasks are filtered (based on the
    /// overlap graph); if false, every call filters all tasks.
    pub incremental: bool,
}

impl Default for CumulativeSweepOptions {
    fn default() -> Self {
        Self {
            propagation_method: CumulativeSweepPropagationMethod::default(),
            use_energy_reasoning: true,
            incremental: true,
        }
    }
}

/// The approach used for filtering the bounds of the tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CumulativeSweepPropagationMethod {
    /// Sweeps over the compulsory parts in both directions.
    #[default]
    Sweep,
    /// Creates a profile per time point and pushes every task past its conflicting time points;
    /// its complexity depends on the size of the time horizon.
    NaiveTimeTable,
}
