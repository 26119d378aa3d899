use std::fmt::Display;
use std::fmt::Formatter;

/// The id under which a propagator registered one of its variables; it is passed back to
/// [`Propagator::notify`](super::Propagator::notify) when that variable changes.
///
/// A propagator chooses its own numbering; the cumulative propagator for example gives the
/// variables of every task a dense block of ids.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "local {}", self.0)
    }
}
