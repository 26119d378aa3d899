use log::debug;

use super::energy::check_energy;
use super::overlap_graph::OverlapGraph;
use super::sweep::SweepFilter;
use super::time_table_naive::propagate_naive_time_table;
use super::utils::util::check_heights;
use super::utils::util::create_tasks;
use super::utils::util::local_id_to_variable;
use super::utils::util::narrow_task_bounds;
use super::utils::util::register_tasks;
use super::utils::util::ConstraintVariable;
use super::utils::ArgTask;
use super::utils::CumulativeSweepParameters;
use super::CumulativeSweepOptions;
use super::CumulativeSweepPropagationMethod;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatusCP;
use crate::create_statistics_struct;
use crate::engine::propagation::EnqueueDecision;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::Priority;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;
use crate::engine::DomainEvent;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// The statistics which are gathered by the [`CumulativeSweepPropagator`].
    CumulativeSweepStatistics {
        num_full_rebuilds: usize,
        num_incremental_updates: usize,
        num_removed_edges: usize,
        num_sweep_passes: usize,
        num_tightened_bounds: usize,
        num_energy_conflicts: usize,
        num_sweep_conflicts: usize,
});

/// Creates a [`CumulativeSweepPropagator`] for a cumulative constraint over several resource
/// dimensions.
#[derive(Clone, Debug)]
pub struct CumulativeSweepConstructor {
    parameters: CumulativeSweepParameters,
}

impl CumulativeSweepConstructor {
    /// Every task should have exactly one height per capacity; `capacities` should contain at
    /// least one resource.
    pub fn new(
        arg_tasks: &[ArgTask],
        capacities: Vec<DomainId>,
        options: CumulativeSweepOptions,
    ) -> Result<Self, ConstraintOperationError> {
        let tasks = create_tasks(arg_tasks, capacities.len())?;
        Ok(CumulativeSweepConstructor {
            parameters: CumulativeSweepParameters {
                tasks: tasks.into_boxed_slice(),
                capacities: capacities.into_boxed_slice(),
                options,
            },
        })
    }
}

impl PropagatorConstructor for CumulativeSweepConstructor {
    type PropagatorImpl = CumulativeSweepPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let parameters = self.parameters;
        register_tasks(&parameters.tasks, &parameters.capacities, &mut context);

        let num_tasks = parameters.num_tasks();
        let num_resources = parameters.num_resources();
        let capacity_upper_bounds = parameters
            .capacities
            .iter()
            .map(|capacity| context.upper_bound(capacity))
            .collect();

        CumulativeSweepPropagator {
            graph: OverlapGraph::new(num_tasks, &mut context),
            filter: SweepFilter::new(num_tasks, num_resources),
            dirty: Vec::with_capacity(num_tasks),
            is_dirty: vec![false; num_tasks],
            subset: Vec::with_capacity(num_tasks),
            energies: Vec::with_capacity(num_resources),
            capacity_upper_bounds,
            requires_full_propagation: true,
            statistics: CumulativeSweepStatistics::default(),
            parameters,
        }
    }
}

/// Propagator for the cumulative constraint over several resource dimensions which combines:
/// - An energy check over a growing set of tasks
/// - A sweep over the compulsory parts which tightens the earliest start times (left to right)
///   and the latest end times (right to left)
/// - An overlap graph which restricts the tasks considered after a change to those which can
///   overlap with (a task which can overlap with) a changed task
///
/// Alternatively, [`CumulativeSweepPropagationMethod::NaiveTimeTable`] replaces the sweep by a
/// filter which creates the resource profile per time point.
#[derive(Clone, Debug)]
pub struct CumulativeSweepPropagator {
    parameters: CumulativeSweepParameters,
    graph: OverlapGraph,
    filter: SweepFilter,
    /// The tasks for which one of the variables changed since the previous call.
    dirty: Vec<usize>,
    is_dirty: Vec<bool>,
    /// The tasks which are filtered in the current call.
    subset: Vec<usize>,
    energies: Vec<i64>,
    /// The upper-bounds of the capacities as seen by the previous notification; a decrease
    /// requires all tasks to be filtered again.
    capacity_upper_bounds: Vec<i32>,
    requires_full_propagation: bool,
    statistics: CumulativeSweepStatistics,
}

impl CumulativeSweepPropagator {
    fn mark_dirty(&mut self, task: usize) {
        if !self.is_dirty[task] {
            self.is_dirty[task] = true;
            self.dirty.push(task);
        }
    }

    fn clear_dirty(&mut self) {
        for &task in self.dirty.iter() {
            self.is_dirty[task] = false;
        }
        self.dirty.clear();
    }

    fn propagate_naive(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        self.clear_dirty();

        for task in self.parameters.tasks.iter() {
            narrow_task_bounds(&mut context, task)?;
        }
        check_heights(&context, &self.parameters, self.parameters.tasks.iter())?;

        if self.parameters.options.use_energy_reasoning {
            self.subset.clear();
            self.subset.extend(0..self.parameters.num_tasks());
            if let Err(conflict) =
                check_energy(&context, &self.parameters, &self.subset, &mut self.energies)
            {
                self.statistics.num_energy_conflicts += 1;
                return Err(conflict);
            }
        }

        let num_tightened = propagate_naive_time_table(&mut context, &self.parameters)?;
        self.statistics.num_tightened_bounds += num_tightened;
        Ok(())
    }

    fn needs_full_rebuild(&self) -> bool {
        self.requires_full_propagation
            || !self.parameters.options.incremental
            || self.graph.is_invalid()
    }

    /// Updates the overlap graph and determines the tasks which are filtered in this call: every
    /// task after a full rebuild, otherwise the tasks within two hops of a changed task.
    fn select_subset(
        &mut self,
        context: &mut PropagationContextMut,
        full_rebuild: bool,
    ) -> PropagationStatusCP {
        if full_rebuild {
            for task in self.parameters.tasks.iter() {
                narrow_task_bounds(context, task)?;
            }

            let num_edges = self.graph.full_rebuild(context, &self.parameters.tasks);
            debug!(
                "full rebuild of {} tasks at checkpoint {}, {num_edges} edges",
                self.parameters.num_tasks(),
                context.get_checkpoint()
            );
            self.statistics.num_full_rebuilds += 1;
            self.requires_full_propagation = false;

            self.subset.clear();
            self.subset.extend(0..self.parameters.num_tasks());
        } else {
            let num_removed =
                self.graph
                    .incremental_update(context, &self.parameters.tasks, &self.dirty)?;
            self.statistics.num_incremental_updates += 1;
            self.statistics.num_removed_edges += num_removed;

            self.graph
                .two_hop_neighbourhood(&*context, self.dirty.iter().copied(), &mut self.subset);
        }

        Ok(())
    }
}

impl Propagator for CumulativeSweepPropagator {
    fn name(&self) -> &str {
        "CumulativeSweep"
    }

    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        if self.parameters.options.propagation_method
            == CumulativeSweepPropagationMethod::NaiveTimeTable
        {
            return self.propagate_naive(context);
        }

        let full_rebuild = self.needs_full_rebuild();
        if !full_rebuild && self.dirty.is_empty() {
            return Ok(());
        }

        self.select_subset(&mut context, full_rebuild)?;
        self.clear_dirty();

        check_heights(
            &context,
            &self.parameters,
            self.subset.iter().map(|&index| &self.parameters.tasks[index]),
        )?;

        if self.parameters.options.use_energy_reasoning {
            if let Err(conflict) =
                check_energy(&context, &self.parameters, &self.subset, &mut self.energies)
            {
                self.statistics.num_energy_conflicts += 1;
                return Err(conflict);
            }
        }

        match self
            .filter
            .filter(&mut context, &self.parameters, &self.subset)
        {
            Ok(outcome) => {
                self.statistics.num_sweep_passes += outcome.num_passes;
                self.statistics.num_tightened_bounds += outcome.num_tightened;
                Ok(())
            }
            Err(conflict) => {
                self.statistics.num_sweep_conflicts += 1;
                Err(conflict)
            }
        }
    }

    fn notify(
        &mut self,
        context: PropagationContext,
        local_id: LocalId,
        _event: DomainEvent,
    ) -> EnqueueDecision {
        match local_id_to_variable(
            local_id,
            self.parameters.num_tasks(),
            self.parameters.num_resources(),
        ) {
            ConstraintVariable::Task(task) => {
                self.mark_dirty(task);
                EnqueueDecision::Enqueue
            }
            ConstraintVariable::Capacity(resource) => {
                let upper_bound = context.upper_bound(&self.parameters.capacities[resource]);
                if upper_bound < self.capacity_upper_bounds[resource] {
                    self.capacity_upper_bounds[resource] = upper_bound;
                    self.requires_full_propagation = true;
                    EnqueueDecision::Enqueue
                } else {
                    EnqueueDecision::Skip
                }
            }
        }
    }

    fn synchronise(&mut self, context: PropagationContext) {
        self.clear_dirty();
        self.graph.synchronise(context.get_checkpoint());
        for (stored, capacity) in self
            .capacity_upper_bounds
            .iter_mut()
            .zip(self.parameters.capacities.iter())
        {
            *stored = context.upper_bound(capacity);
        }
    }

    fn debug_propagate_from_scratch(
        &self,
        mut context: PropagationContextMut,
    ) -> PropagationStatusCP {
        for task in self.parameters.tasks.iter() {
            narrow_task_bounds(&mut context, task)?;
        }
        check_heights(&context, &self.parameters, self.parameters.tasks.iter())?;
        let _ = propagate_naive_time_table(&mut context, &self.parameters)?;
        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
