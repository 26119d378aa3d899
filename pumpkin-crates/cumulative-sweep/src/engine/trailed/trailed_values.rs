use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// Reversible integers; assignments made after a checkpoint are undone when synchronising to it.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|change| self.values[change.reference] = change.old_value)
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        self.trail.push(TrailedChange {
            old_value,
            reference: trailed_integer,
        });
        self.values[trailed_integer] = value;
    }
}
