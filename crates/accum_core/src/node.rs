use crate::error::AccumulateError;

/// One level of an accumulator tree, seen from its parent.
///
/// A parent holds its children as `Box<dyn GroupNode<T, R>>` where `T` is the
/// parent's entity type and `R` the shared row type. Each child closes over its
/// own entity and key types, so levels of different shapes can be chained.
///
/// The `parent` argument is a borrow of the parent's in-progress entity. It is
/// only valid for the duration of the call and must never be retained.
pub trait GroupNode<P, R> {
    /// Feed one row. Continues the current entity when the key matches,
    /// otherwise transitions to a new one.
    fn accumulate_with(&mut self, parent: Option<&mut P>, row: &R) -> Result<(), AccumulateError>;

    /// Complete the current entity (if any) and start a new one from `row`.
    ///
    /// Returns `false` when the builder produced nothing for the row; the
    /// current entity is then left untouched.
    fn transition_with(&mut self, parent: Option<&mut P>, row: &R) -> Result<bool, AccumulateError>;

    /// Complete the current entity without starting a new one.
    fn flush_with(&mut self, parent: Option<&mut P>) -> Result<(), AccumulateError>;
}

impl<P, R, N> GroupNode<P, R> for Box<N>
where
    N: GroupNode<P, R> + ?Sized,
{
    fn accumulate_with(&mut self, parent: Option<&mut P>, row: &R) -> Result<(), AccumulateError> {
        self.as_mut().accumulate_with(parent, row)
    }

    fn transition_with(&mut self, parent: Option<&mut P>, row: &R) -> Result<bool, AccumulateError> {
        self.as_mut().transition_with(parent, row)
    }

    fn flush_with(&mut self, parent: Option<&mut P>) -> Result<(), AccumulateError> {
        self.as_mut().flush_with(parent)
    }
}
