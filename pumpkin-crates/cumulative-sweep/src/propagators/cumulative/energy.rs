//! A necessary condition for the feasibility of a set of tasks: the minimum energy of the tasks
//! (their minimum duration times their minimum height) has to fit in the area spanned by the time
//! window of the tasks and the maximum capacity.
use log::debug;

use super::utils::CumulativeSweepParameters;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::propagation::ReadDomains;

/// Adds the tasks of `subset` one by one (in the given order) while maintaining the minimum
/// earliest start, the maximum latest end and the total energy per resource; fails as soon as
/// the energy of the tasks seen so far exceeds the available area.
///
/// This check never tightens any bound.
pub(crate) fn check_energy(
    context: &impl ReadDomains,
    parameters: &CumulativeSweepParameters,
    subset: &[usize],
    energies: &mut Vec<i64>,
) -> PropagationStatusCP {
    energies.clear();
    energies.resize(parameters.num_resources(), 0);

    let capacities = parameters
        .capacities
        .iter()
        .map(|capacity| context.upper_bound(capacity) as i64)
        .collect::<Vec<_>>();

    let mut window_start = i64::MAX;
    let mut window_end = i64::MIN;

    for (processed, &index) in subset.iter().enumerate() {
        let task = &parameters.tasks[index];
        window_start = window_start.min(task.earliest_start(context) as i64);
        window_end = window_end.max(task.latest_end(context) as i64);

        let duration = task.min_duration(context) as i64;
        let span = window_end - window_start;

        for (resource, energy) in energies.iter_mut().enumerate() {
            *energy += duration * task.min_height(context, resource) as i64;

            let available = capacities[resource] * span;
            if *energy > available {
                debug!(
                    "energy {energy} of {} tasks exceeds {available} on resource {resource}",
                    processed + 1
                );
                return Err(PropagatorConflict::EnergyOverload {
                    resource,
                    tasks: subset[..=processed].to_vec(),
                    required: *energy,
                    available,
                }
                .into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Inconsistency;
    use crate::engine::propagation::PropagationContext;
    use crate::engine::variables::DomainId;
    use crate::engine::Assignments;
    use crate::engine::TrailedValues;
    use crate::propagators::cumulative::utils::Task;
    use crate::propagators::cumulative::CumulativeSweepOptions;

    fn parameters(
        assignments: &mut Assignments,
        tasks: &[((i32, i32), i32, i32)],
        capacity: i32,
    ) -> CumulativeSweepParameters {
        let tasks = tasks
            .iter()
            .enumerate()
            .map(|(index, &((est, lct), duration, height))| Task {
                start_variable: assignments.grow(est, lct - duration),
                duration_variable: assignments.grow(duration, duration),
                end_variable: assignments.grow(est + duration, lct),
                resource_usages: vec![assignments.grow(height, height)].into_boxed_slice(),
                index,
            })
            .collect::<Vec<_>>();
        let capacities: Box<[DomainId]> = vec![assignments.grow(0, capacity)].into_boxed_slice();

        CumulativeSweepParameters {
            tasks: tasks.into_boxed_slice(),
            capacities,
            options: CumulativeSweepOptions::default(),
        }
    }

    #[test]
    fn energy_fitting_in_the_window_is_accepted() {
        let mut assignments = Assignments::default();
        let trailed_values = TrailedValues::default();
        // Two tasks of energy 4 in the window [0, 4) with capacity 2.
        let parameters = parameters(&mut assignments, &[((0, 4), 2, 2), ((0, 4), 4, 1)], 2);

        let context = PropagationContext::new(&assignments, &trailed_values);
        let mut energies = vec![];

        assert!(check_energy(&context, &parameters, &[0, 1], &mut energies).is_ok());
        assert_eq!(vec![8], energies);
    }

    #[test]
    fn energy_overload_names_the_processed_tasks() {
        let mut assignments = Assignments::default();
        let trailed_values = TrailedValues::default();
        let parameters = parameters(
            &mut assignments,
            &[((0, 3), 3, 1), ((0, 3), 2, 1), ((10, 20), 1, 1)],
            1,
        );

        let context = PropagationContext::new(&assignments, &trailed_values);
        let result = check_energy(&context, &parameters, &[0, 1, 2], &mut vec![]);

        assert_eq!(
            Err(Inconsistency::Conflict(PropagatorConflict::EnergyOverload {
                resource: 0,
                tasks: vec![0, 1],
                required: 5,
                available: 3,
            })),
            result
        );
    }
}
