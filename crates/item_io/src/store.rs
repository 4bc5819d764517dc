//! Sinks for items.

use crate::error::ItemError;
use crate::model::Item;

#[path = "store/csv.rs"]
mod csv;

pub use self::csv::CsvItemStore;

/// Accepts items one at a time.
pub trait ItemStore {
    /// Human-readable description used in logs.
    fn describe(&self) -> String;

    fn store_item(&mut self, item: &Item) -> Result<(), ItemError>;

    /// Flush anything buffered. Called once after the last item.
    fn finish(&mut self) -> Result<(), ItemError> {
        Ok(())
    }
}
