#![allow(dead_code)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use accum_core::BoxError;

/// Row shape used across the integration tests: one string per column.
pub type Row = Vec<String>;

/// Build rows from string slices.
pub fn rows(table: &[&[&str]]) -> Vec<Row> {
    table
        .iter()
        .map(|row| row.iter().map(|field| field.to_string()).collect())
        .collect()
}

/// Read a column, failing like a malformed CSV line would.
pub fn column(row: &Row, index: usize) -> Result<String, BoxError> {
    row.get(index)
        .cloned()
        .ok_or_else(|| format!("row has no column {index}").into())
}

/// Shared sink that records emitted entities in emission order.
#[derive(Debug)]
pub struct Collector<T> {
    items: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone> Collector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitter closure that pushes into this collector.
    pub fn sink(&self) -> impl FnMut(T) -> Result<(), BoxError> {
        let items = Rc::clone(&self.items);
        move |item| {
            items.borrow_mut().push(item);
            Ok(())
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.borrow().clone()
    }
}
