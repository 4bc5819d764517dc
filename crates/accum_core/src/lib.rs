//! Single-pass grouping of key-ordered rows into nested entities.
//!
//! An [`Accumulator`] consumes rows one at a time. Contiguous rows that share a
//! key are folded into one entity; when the key changes the finished entity is
//! emitted and a new one is started. Accumulators can be chained so that a
//! child builds a collection inside its parent's entity from the very same
//! rows, turning a denormalized table into a hierarchy without buffering the
//! input.
//!
//! Rows must be grouped by key. Sorting is the caller's job.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use accum_core::Accumulator;
//!
//! #[derive(Debug)]
//! struct Person { id: String, dishes: Vec<String> }
//!
//! type Row = [&'static str; 3];
//!
//! let people = RefCell::new(Vec::new());
//! let dishes = Accumulator::nested(
//!     |row: &Row| Ok(row[2].to_string()),
//!     |dish: &String| dish.clone(),
//!     |row: &Row| Ok(Some(row[2].to_string())),
//! )
//! .with_into_parent(|dish: String, person: &mut Person| {
//!     person.dishes.push(dish);
//!     Ok(())
//! });
//! let mut root = Accumulator::new(
//!     |row: &Row| Ok(row[0].to_string()),
//!     |person: &Person| person.id.clone(),
//!     |row: &Row| Ok(Some(Person { id: row[0].to_string(), dishes: Vec::new() })),
//! )
//! .with_chained(dishes)
//! .with_emitter(|person| {
//!     people.borrow_mut().push(person);
//!     Ok(())
//! });
//!
//! let rows = [
//!     ["1", "Joe", "Chicken"],
//!     ["1", "Joe", "Chicken"],
//!     ["2", "Bob", "Steak"],
//!     ["2", "Bob", "Fish"],
//! ];
//! for row in &rows {
//!     root.accumulate(row)?;
//! }
//! root.flush()?;
//! drop(root);
//!
//! let people = people.into_inner();
//! assert_eq!(people.len(), 2);
//! assert_eq!(people[0].dishes, vec!["Chicken"]);
//! assert_eq!(people[1].dishes, vec!["Steak", "Fish"]);
//! # Ok::<(), accum_core::AccumulateError>(())
//! ```
//!
//! # Modules
//!
//! - [`accumulator`]: the grouping state machine
//! - [`node`]: the object-safe interface between a parent and its children
//! - [`guard`]: optional detection of ungrouped input
//! - [`error`]: error types

pub mod accumulator;
pub mod error;
pub mod guard;
pub mod node;

pub use accumulator::Accumulator;
pub use error::{AccumulateError, BoxError};
pub use guard::{GroupTracker, KeyGuard};
pub use node::GroupNode;
