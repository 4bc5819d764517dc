//! The key-grouping state machine.
//!
//! An [`Accumulator`] is in one of two states: empty, or accumulating an entity
//! for some key. A row whose key matches the current entity continues it (and
//! is forwarded to the chained children); any other row completes the current
//! entity and starts a new one. End of input is signalled with
//! [`Accumulator::flush`].

use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::{AccumulateError, BoxError};
use crate::guard::{GroupTracker, KeyGuard};
use crate::node::GroupNode;

type RowKeyFn<'a, R, K> = Box<dyn FnMut(&R) -> Result<K, BoxError> + 'a>;
type EntityKeyFn<'a, T, K> = Box<dyn Fn(&T) -> K + 'a>;
type BuildFn<'a, R, T> = Box<dyn FnMut(&R) -> Result<Option<T>, BoxError> + 'a>;
type PostBuildFn<'a, T, P> = Box<dyn FnMut(&mut T, &mut P) -> Result<(), BoxError> + 'a>;
type SinkFn<'a, T> = Box<dyn FnMut(T) -> Result<(), BoxError> + 'a>;
type IntoParentFn<'a, T, P> = Box<dyn FnMut(T, &mut P) -> Result<(), BoxError> + 'a>;

/// Where a completed entity goes.
enum Emission<'a, P, T> {
    Discard,
    Sink(SinkFn<'a, T>),
    Parent(IntoParentFn<'a, T, P>),
}

/// Folds contiguous runs of same-key rows into entities.
///
/// Type parameters:
///
/// * `P` - entity type of the parent node (`()` for a root)
/// * `T` - entity built by this node
/// * `R` - row type, shared by the whole tree
/// * `K` - grouping key of this node
///
/// Rows must arrive grouped by `K`. A key change is read as the end of the
/// current entity, so an ungrouped stream yields extra, smaller entities unless
/// [`Accumulator::with_group_check`] is enabled.
///
/// Completed entities are handed to the emitter exactly once, when the next
/// group starts or when the node is flushed. Chained children are flushed
/// against the parent's entity before that entity is emitted, so an emitted
/// entity already carries every child collection.
pub struct Accumulator<'a, P, T, R, K> {
    row_key: RowKeyFn<'a, R, K>,
    entity_key: EntityKeyFn<'a, T, K>,
    build: BuildFn<'a, R, T>,
    post_build: Option<PostBuildFn<'a, T, P>>,
    emission: Emission<'a, P, T>,
    guard: Option<Box<dyn KeyGuard<K> + 'a>>,
    children: Vec<Box<dyn GroupNode<T, R> + 'a>>,
    current: Option<T>,
    completed: u64,
}

impl<'a, T, R, K> Accumulator<'a, (), T, R, K> {
    /// Create a root accumulator.
    ///
    /// * `row_key` - computes the grouping key of a row
    /// * `entity_key` - reads the grouping key back from an in-progress entity
    /// * `build` - builds a new entity from the first row of a group;
    ///   `Ok(None)` means the row starts nothing
    pub fn new<RK, EK, B>(row_key: RK, entity_key: EK, build: B) -> Self
    where
        RK: FnMut(&R) -> Result<K, BoxError> + 'a,
        EK: Fn(&T) -> K + 'a,
        B: FnMut(&R) -> Result<Option<T>, BoxError> + 'a,
    {
        Self::from_fns(row_key, entity_key, build)
    }
}

impl<'a, P, T, R, K> Accumulator<'a, P, T, R, K> {
    /// Create an accumulator meant to be chained under a parent building `P`.
    pub fn nested<RK, EK, B>(row_key: RK, entity_key: EK, build: B) -> Self
    where
        RK: FnMut(&R) -> Result<K, BoxError> + 'a,
        EK: Fn(&T) -> K + 'a,
        B: FnMut(&R) -> Result<Option<T>, BoxError> + 'a,
    {
        Self::from_fns(row_key, entity_key, build)
    }

    fn from_fns<RK, EK, B>(row_key: RK, entity_key: EK, build: B) -> Self
    where
        RK: FnMut(&R) -> Result<K, BoxError> + 'a,
        EK: Fn(&T) -> K + 'a,
        B: FnMut(&R) -> Result<Option<T>, BoxError> + 'a,
    {
        Self {
            row_key: Box::new(row_key),
            entity_key: Box::new(entity_key),
            build: Box::new(build),
            post_build: None,
            emission: Emission::Discard,
            guard: None,
            children: Vec::new(),
            current: None,
            completed: 0,
        }
    }

    /// Send every completed entity to `emitter`.
    ///
    /// Replaces a previous emitter or [`with_into_parent`](Self::with_into_parent) hook.
    pub fn with_emitter<E>(mut self, emitter: E) -> Self
    where
        E: FnMut(T) -> Result<(), BoxError> + 'a,
    {
        self.emission = Emission::Sink(Box::new(emitter));
        self
    }

    /// Move every completed entity into the parent's in-progress entity.
    ///
    /// Replaces a previous emitter. Completion happens before the parent itself
    /// is completed, so the parent is emitted with the moved entity inside.
    /// Driven without a parent context (as a root), completed entities are
    /// dropped.
    pub fn with_into_parent<H>(mut self, hook: H) -> Self
    where
        H: FnMut(T, &mut P) -> Result<(), BoxError> + 'a,
    {
        self.emission = Emission::Parent(Box::new(hook));
        self
    }

    /// Run `hook` on every newly built entity together with the parent entity.
    ///
    /// The hook runs after this node's own children have been seeded, and only
    /// when a parent context is present.
    pub fn with_post_build<H>(mut self, hook: H) -> Self
    where
        H: FnMut(&mut T, &mut P) -> Result<(), BoxError> + 'a,
    {
        self.post_build = Some(Box::new(hook));
        self
    }

    /// Chain a child accumulator. Children are driven in the order they were chained.
    pub fn with_chained<C>(mut self, child: C) -> Self
    where
        C: GroupNode<T, R> + 'a,
    {
        self.children.push(Box::new(child));
        self
    }

    /// Attach a guard that observes the key of every entity this node starts.
    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: KeyGuard<K> + 'a,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// The entity currently being built.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Number of entities completed so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Complete the current entity: flush children against it, then hand it off.
    fn complete(&mut self, parent: Option<&mut P>) -> Result<(), AccumulateError> {
        let Some(mut entity) = self.current.take() else {
            return Ok(());
        };
        for child in &mut self.children {
            child.flush_with(Some(&mut entity))?;
        }

        self.completed += 1;
        trace!(completed = self.completed, "entity completed");
        match &mut self.emission {
            Emission::Discard => {}
            Emission::Sink(emit) => emit(entity).map_err(AccumulateError::Emit)?,
            Emission::Parent(attach) => match parent {
                Some(parent) => attach(entity, parent).map_err(AccumulateError::IntoParent)?,
                None => debug!(
                    completed = self.completed,
                    "no parent context, completed entity dropped"
                ),
            },
        }
        Ok(())
    }
}

impl<'a, P, T, R, K> Accumulator<'a, P, T, R, K>
where
    K: Eq + Hash + Clone + fmt::Debug + 'a,
{
    /// Fail with [`AccumulateError::GroupReopened`] when a completed key starts
    /// again. For a chained node the check is scoped to one parent entity.
    pub fn with_group_check(self) -> Self {
        self.with_guard(GroupTracker::new())
    }
}

impl<'a, P, T, R, K> Accumulator<'a, P, T, R, K>
where
    K: PartialEq,
{
    /// Feed one row without a parent context.
    pub fn accumulate(&mut self, row: &R) -> Result<(), AccumulateError> {
        self.accumulate_with(None, row)
    }

    /// Complete the current entity and start a new one from `row`, regardless
    /// of its key.
    ///
    /// Returns the new current entity, or `None` when the builder produced
    /// nothing for the row.
    pub fn transition(&mut self, row: &R) -> Result<Option<&T>, AccumulateError> {
        if self.transition_with(None, row)? {
            Ok(self.current.as_ref())
        } else {
            Ok(None)
        }
    }

    /// Emit the pending entity at end of input. The node is empty afterwards.
    pub fn flush(&mut self) -> Result<(), AccumulateError> {
        self.flush_with(None)?;
        debug!(completed = self.completed, "accumulator flushed");
        Ok(())
    }

    /// Accumulate every row then flush. Returns the number of entities completed
    /// during this call.
    pub fn run<I>(&mut self, rows: I) -> Result<u64, AccumulateError>
    where
        I: IntoIterator<Item = R>,
    {
        let before = self.completed;
        for row in rows {
            self.accumulate(&row)?;
        }
        self.flush()?;
        Ok(self.completed - before)
    }

    fn continues(&mut self, row: &R) -> Result<bool, AccumulateError> {
        let Some(current) = self.current.as_ref() else {
            return Ok(false);
        };
        let key = (self.row_key)(row).map_err(AccumulateError::RowKey)?;
        Ok(key == (self.entity_key)(current))
    }
}

impl<'a, P, T, R, K> GroupNode<P, R> for Accumulator<'a, P, T, R, K>
where
    K: PartialEq,
{
    fn accumulate_with(&mut self, parent: Option<&mut P>, row: &R) -> Result<(), AccumulateError> {
        if !self.continues(row)? {
            return self.transition_with(parent, row).map(|_| ());
        }
        if let Some(current) = self.current.as_mut() {
            for child in &mut self.children {
                child.accumulate_with(Some(&mut *current), row)?;
            }
        }
        Ok(())
    }

    fn transition_with(
        &mut self,
        mut parent: Option<&mut P>,
        row: &R,
    ) -> Result<bool, AccumulateError> {
        let Some(built) = (self.build)(row).map_err(AccumulateError::Build)? else {
            trace!("row built no entity, current entity kept");
            return Ok(false);
        };
        if let Some(guard) = self.guard.as_mut() {
            guard.open(&(self.entity_key)(&built))?;
        }
        self.complete(parent.as_deref_mut())?;

        let current = self.current.insert(built);
        for child in &mut self.children {
            child.transition_with(Some(&mut *current), row)?;
        }
        if let (Some(hook), Some(parent)) = (self.post_build.as_mut(), parent) {
            hook(current, parent).map_err(AccumulateError::PostBuild)?;
        }
        Ok(true)
    }

    fn flush_with(&mut self, parent: Option<&mut P>) -> Result<(), AccumulateError> {
        self.complete(parent)?;
        if let Some(guard) = self.guard.as_mut() {
            guard.reset();
        }
        Ok(())
    }
}

impl<P, T, R, K> fmt::Debug for Accumulator<'_, P, T, R, K>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("current", &self.current)
            .field("children", &self.children.len())
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}
