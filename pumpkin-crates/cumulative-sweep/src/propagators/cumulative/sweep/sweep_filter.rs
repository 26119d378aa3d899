use log::debug;
use log::trace;

use super::direction::EarliestStart;
use super::direction::EventHeaps;
use super::direction::LatestEnd;
use super::direction::SweepDirection;
use super::event_heap::Event;
use super::event_heap::EventHeap;
use super::event_heap::EventKind;
use super::task_rings::TaskRings;
use super::task_rings::TaskState;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::ReadDomains;
use crate::propagators::cumulative::utils::util::narrow_task_bounds;
use crate::propagators::cumulative::utils::util::raise_capacity;
use crate::propagators::cumulative::utils::CumulativeSweepParameters;
use crate::pumpkin_assert_advanced;
use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;

/// The result of [`SweepFilter::filter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SweepOutcome {
    /// The number of single-direction sweeps which were performed.
    pub(crate) num_passes: usize,
    /// The number of bounds which were tightened.
    pub(crate) num_tightened: usize,
}

/// Filters the earliest start and latest end times of a subset of the tasks by sweeping over the
/// time line in both directions until neither direction tightens a bound.
///
/// All of the memory used by a sweep is allocated once, when the filter is created.
#[derive(Clone, Debug)]
pub(crate) struct SweepFilter {
    heaps: EventHeaps,
    batch: Vec<Event>,
    state: SweepState,
}

impl SweepFilter {
    pub(crate) fn new(num_tasks: usize, num_resources: usize) -> Self {
        SweepFilter {
            heaps: EventHeaps::with_capacity(4 * num_tasks),
            batch: Vec::with_capacity(4 * num_tasks),
            state: SweepState::new(num_tasks, num_resources),
        }
    }

    /// Sweeps over the tasks of `subset` in both directions until a fixpoint is reached.
    ///
    /// Fails with a [`PropagatorConflict::ResourceOverload`] if the compulsory parts exceed the
    /// capacity of a resource at some time point.
    pub(crate) fn filter(
        &mut self,
        context: &mut PropagationContextMut,
        parameters: &CumulativeSweepParameters,
        subset: &[usize],
    ) -> Result<SweepOutcome, Inconsistency> {
        let mut outcome = SweepOutcome::default();
        loop {
            let tightened = self.sweep::<EarliestStart>(context, parameters, subset)?
                + self.sweep::<LatestEnd>(context, parameters, subset)?;

            outcome.num_passes += 2;
            outcome.num_tightened += tightened;

            if tightened == 0 {
                return Ok(outcome);
            }
        }
    }

    /// Performs a single sweep in direction `D` and applies the new releases; returns the number
    /// of tasks whose release was tightened.
    pub(crate) fn sweep<D: SweepDirection>(
        &mut self,
        context: &mut PropagationContextMut,
        parameters: &CumulativeSweepParameters,
        subset: &[usize],
    ) -> Result<usize, Inconsistency> {
        let heap = D::event_heap(&mut self.heaps);
        let state = &mut self.state;

        heap.clear();
        state.initialise::<D>(&*context, parameters, subset, heap);

        while let Some(date) = heap.pop_all_at_extreme(&mut self.batch) {
            state.gap_before.copy_from_slice(&state.gap);
            state.releases.clear();

            for event in self.batch.iter() {
                match event.kind {
                    EventKind::StartOfCompulsoryPart | EventKind::LatestStart => {
                        state.start_compulsory_part::<D>(heap, date, event.task)
                    }
                    EventKind::EndOfCompulsoryPart => state.end_compulsory_part(date, event.task),
                    EventKind::Release => state.releases.push(event.task),
                    EventKind::EndOfPlacementWindow => state.end_placement_window(event.task),
                }
            }

            state.check_overload::<D>(date, subset)?;
            state.record_load();

            let next_date = heap.peek_date();
            state.classify_releases::<D>(date, next_date);
            state.react_to_gap_changes::<D>(date, next_date);

            pumpkin_assert_advanced!(state.rings.debug_check_consistency());
        }

        pumpkin_assert_moderate!(
            state.rings.is_empty(TaskState::None)
                && (0..state.num_resources)
                    .all(|resource| state.rings.is_empty(TaskState::Conflict(resource)))
        );

        let num_tightened = state.apply::<D>(context, parameters, subset)?;
        trace!("{} sweep tightened {num_tightened} tasks", D::NAME);
        Ok(num_tightened)
    }
}

/// The per-task and per-resource data of a single sweep.
#[derive(Clone, Debug)]
struct SweepState {
    num_resources: usize,
    rings: TaskRings,
    /// The tasks whose release event occurs at the current date.
    releases: Vec<usize>,

    /// The release of every task at the start of the sweep.
    release: Vec<i32>,
    /// The release found by the sweep so far.
    new_release: Vec<i32>,
    compulsory_start: Vec<i32>,
    compulsory_end: Vec<i32>,
    duration: Vec<i32>,
    /// The earliest date (in the order of the sweep) at which the task ends given its new
    /// release.
    earliest_end: Vec<i32>,
    /// The minimum heights, task-major.
    heights: Vec<i64>,
    /// The date of the only end event of the task which is not stale.
    pending_end: Vec<Option<i32>>,
    /// Whether the height of the task is currently subtracted from the gaps.
    in_profile: Vec<bool>,

    capacity: Vec<i64>,
    /// The free capacity of each resource at the current date.
    gap: Vec<i64>,
    gap_before: Vec<i64>,
    max_load: Vec<i64>,
}

impl SweepState {
    fn new(num_tasks: usize, num_resources: usize) -> Self {
        SweepState {
            num_resources,
            rings: TaskRings::new(num_tasks, num_resources),
            releases: Vec::with_capacity(num_tasks),
            release: vec![0; num_tasks],
            new_release: vec![0; num_tasks],
            compulsory_start: vec![0; num_tasks],
            compulsory_end: vec![0; num_tasks],
            duration: vec![0; num_tasks],
            earliest_end: vec![0; num_tasks],
            heights: vec![0; num_tasks * num_resources],
            pending_end: vec![None; num_tasks],
            in_profile: vec![false; num_tasks],
            capacity: vec![0; num_resources],
            gap: vec![0; num_resources],
            gap_before: vec![0; num_resources],
            max_load: vec![0; num_resources],
        }
    }

    fn height(&self, task: usize, resource: usize) -> i64 {
        self.heights[task * self.num_resources + resource]
    }

    fn first_violated_resource(&self, task: usize) -> Option<usize> {
        (0..self.num_resources).find(|&resource| self.height(task, resource) > self.gap[resource])
    }

    fn initialise<D: SweepDirection>(
        &mut self,
        context: &impl ReadDomains,
        parameters: &CumulativeSweepParameters,
        subset: &[usize],
        heap: &mut EventHeap<D::Order>,
    ) {
        self.rings.reset(subset);

        for (resource, capacity) in parameters.capacities.iter().enumerate() {
            self.capacity[resource] = context.upper_bound(capacity) as i64;
            self.gap[resource] = self.capacity[resource];
            self.max_load[resource] = 0;
        }

        for &index in subset {
            let task = &parameters.tasks[index];

            let release = D::release(context, task);
            let compulsory_start = D::compulsory_start(context, task);
            let compulsory_end = D::compulsory_end(context, task);
            let duration = task.min_duration(context);

            self.release[index] = release;
            self.new_release[index] = release;
            self.compulsory_start[index] = compulsory_start;
            self.compulsory_end[index] = compulsory_end;
            self.duration[index] = duration;
            self.earliest_end[index] = D::later(compulsory_end, D::shift(release, duration));
            self.in_profile[index] = false;
            self.pending_end[index] = None;
            for resource in 0..self.num_resources {
                self.heights[index * self.num_resources + resource] =
                    task.min_height(context, resource) as i64;
            }

            if D::precedes(compulsory_start, compulsory_end) {
                heap.insert(Event {
                    date: compulsory_start,
                    task: index,
                    kind: EventKind::StartOfCompulsoryPart,
                });
                heap.insert(Event {
                    date: compulsory_end,
                    task: index,
                    kind: EventKind::EndOfCompulsoryPart,
                });
                self.pending_end[index] = Some(compulsory_end);
            } else {
                heap.insert(Event {
                    date: compulsory_start,
                    task: index,
                    kind: EventKind::LatestStart,
                });

                if duration == 0 && D::precedes(release, compulsory_end) {
                    heap.insert(Event {
                        date: compulsory_end,
                        task: index,
                        kind: EventKind::EndOfPlacementWindow,
                    });
                }
            }

            if D::precedes(release, compulsory_start) {
                heap.insert(Event {
                    date: release,
                    task: index,
                    kind: EventKind::Release,
                });
            } else {
                self.rings.move_to(index, TaskState::Ready);
            }
        }

        pumpkin_assert_moderate!(heap.len() <= 3 * subset.len());
    }

    /// The task cannot be placed any later than `date`; its (extended) compulsory part starts.
    fn start_compulsory_part<D: SweepDirection>(
        &mut self,
        heap: &mut EventHeap<D::Order>,
        date: i32,
        task: usize,
    ) {
        let state = self.rings.state(task);
        pumpkin_assert_simple!(
            state != TaskState::None,
            "task {task} reached its latest start before its release"
        );
        match state {
            TaskState::Conflict(_) => {
                self.new_release[task] = self.compulsory_start[task];
                self.rings.move_to(task, TaskState::Ready);
            }
            TaskState::Check => self.rings.move_to(task, TaskState::Ready),
            TaskState::Ready | TaskState::None => {}
        }

        let end = D::later(
            self.compulsory_end[task],
            D::shift(self.new_release[task], self.duration[task]),
        );
        if !D::precedes(date, end) {
            return;
        }

        for resource in 0..self.num_resources {
            self.gap[resource] -= self.height(task, resource);
        }
        self.in_profile[task] = true;

        if self.pending_end[task] != Some(end) {
            heap.insert(Event {
                date: end,
                task,
                kind: EventKind::EndOfCompulsoryPart,
            });
            self.pending_end[task] = Some(end);
        }
    }

    /// A task with a minimum duration of 0 which is still in conflict fits at its compulsory
    /// end, where it no longer overlaps any date.
    fn end_placement_window(&mut self, task: usize) {
        if let TaskState::Conflict(_) = self.rings.state(task) {
            self.new_release[task] = self.compulsory_end[task];
            self.earliest_end[task] = self.compulsory_end[task];
            self.rings.move_to(task, TaskState::Ready);
        }
    }

    fn end_compulsory_part(&mut self, date: i32, task: usize) {
        if !self.in_profile[task] || self.pending_end[task] != Some(date) {
            // The compulsory part of the task has been extended past this event.
            return;
        }

        for resource in 0..self.num_resources {
            self.gap[resource] += self.height(task, resource);
        }
        self.in_profile[task] = false;
        self.pending_end[task] = None;
    }

    fn check_overload<D: SweepDirection>(
        &self,
        date: i32,
        subset: &[usize],
    ) -> Result<(), PropagatorConflict> {
        let Some(resource) = (0..self.num_resources).find(|&resource| self.gap[resource] < 0)
        else {
            return Ok(());
        };

        let tasks = subset
            .iter()
            .copied()
            .filter(|&task| self.in_profile[task] && self.height(task, resource) > 0)
            .collect::<Vec<_>>();
        debug!(
            "{} sweep found an overload of resource {resource} at {} by {tasks:?}",
            D::NAME,
            D::cell(date)
        );

        Err(PropagatorConflict::ResourceOverload {
            resource,
            time_point: D::cell(date),
            tasks,
        })
    }

    fn record_load(&mut self) {
        for resource in 0..self.num_resources {
            self.max_load[resource] =
                self.max_load[resource].max(self.capacity[resource] - self.gap[resource]);
        }
    }

    fn classify_releases<D: SweepDirection>(&mut self, date: i32, next_date: Option<i32>) {
        for position in 0..self.releases.len() {
            let task = self.releases[position];
            self.classify::<D>(task, date, next_date);
        }
    }

    /// Places a task which can start at `date` in the ring which matches its situation.
    fn classify<D: SweepDirection>(&mut self, task: usize, date: i32, next_date: Option<i32>) {
        let state = if !D::precedes(date, self.earliest_end[task]) {
            TaskState::Ready
        } else if let Some(resource) = self.first_violated_resource(task) {
            TaskState::Conflict(resource)
        } else if next_date.is_some_and(|next| D::precedes(next, self.earliest_end[task])) {
            TaskState::Check
        } else {
            TaskState::Ready
        };
        self.rings.move_to(task, state);
    }

    fn react_to_gap_changes<D: SweepDirection>(&mut self, date: i32, next_date: Option<i32>) {
        for resource in 0..self.num_resources {
            if self.gap[resource] >= self.gap_before[resource] {
                continue;
            }

            let mut current = self.rings.first_of(TaskState::Check);
            while let Some(task) = current {
                current = self.rings.next(task);

                if !D::precedes(date, self.earliest_end[task]) {
                    self.rings.move_to(task, TaskState::Ready);
                } else if self.height(task, resource) > self.gap[resource] {
                    self.rings.move_to(task, TaskState::Conflict(resource));
                }
            }
        }

        for resource in 0..self.num_resources {
            if self.gap[resource] <= self.gap_before[resource] {
                continue;
            }

            let mut current = self.rings.first_of(TaskState::Conflict(resource));
            while let Some(task) = current {
                current = self.rings.next(task);

                if let Some(violated) = self.first_violated_resource(task) {
                    self.rings.move_to(task, TaskState::Conflict(violated));
                    continue;
                }

                self.new_release[task] = date;
                self.earliest_end[task] = D::later(
                    self.compulsory_end[task],
                    D::shift(date, self.duration[task]),
                );
                self.classify::<D>(task, date, next_date);
            }
        }
    }

    /// Writes the new releases to the domains and raises the capacities to the largest load
    /// which was encountered.
    fn apply<D: SweepDirection>(
        &self,
        context: &mut PropagationContextMut,
        parameters: &CumulativeSweepParameters,
        subset: &[usize],
    ) -> Result<usize, Inconsistency> {
        let mut num_tightened = 0;
        for &index in subset {
            if self.new_release[index] == self.release[index] {
                continue;
            }

            let task = &parameters.tasks[index];
            D::update_release(context, task, self.new_release[index])?;
            narrow_task_bounds(context, task)?;
            num_tightened += 1;
        }

        for resource in 0..self.num_resources {
            raise_capacity(context, parameters, resource, self.max_load[resource])?;
        }

        Ok(num_tightened)
    }
}
