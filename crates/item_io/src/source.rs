//! Producers of items.

use crate::error::ItemError;
use crate::model::Item;

#[path = "source/csv.rs"]
mod csv;

pub use self::csv::CsvItemSource;

/// Produces items, one call to the consumer per item, in source order.
pub trait ItemSource {
    /// Human-readable description used in logs.
    fn describe(&self) -> String;

    /// Hand every item to `consumer`. A consumer error aborts iteration and is
    /// returned unchanged. Returns the number of items produced.
    fn iterate_items(
        &mut self,
        consumer: &mut dyn FnMut(Item) -> Result<(), ItemError>,
    ) -> Result<u64, ItemError>;
}
