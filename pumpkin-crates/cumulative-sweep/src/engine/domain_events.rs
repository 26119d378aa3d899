/// The kind of change which happened to the domain of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainEvent {
    /// The lower-bound of the domain was raised.
    LowerBound,
    /// The upper-bound of the domain was lowered.
    UpperBound,
    /// The domain became a single value.
    Assign,
}
