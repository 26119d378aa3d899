use std::fmt::Display;

use crate::containers::StorageKey;

/// Identifies an integer variable (with an interval domain) in the
/// [`Assignments`](crate::engine::Assignments).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId {
    pub id: u32,
}

impl DomainId {
    pub const fn new(id: u32) -> Self {
        DomainId { id }
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId::new(index as u32)
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
