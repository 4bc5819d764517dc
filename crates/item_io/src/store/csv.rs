use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use super::ItemStore;
use crate::error::ItemError;
use crate::layout::{CsvLayout, HEADERS};
use crate::model::Item;

/// Writes items as `ItemName,AttribName,AttribValue` rows, one row per
/// attribute. The output is grouped by item and can be read back by
/// [`crate::CsvItemSource`] with the same layout.
///
/// Fields are placed at the layout's column indices; columns the layout does
/// not name are left empty. An item without attributes writes no rows.
pub struct CsvItemStore<W: io::Write> {
    writer: csv::Writer<W>,
    /// Item, attribute name and attribute value column.
    columns: [usize; 3],
    width: usize,
    label: String,
    rows: u64,
}

impl CsvItemStore<File> {
    pub fn create(path: impl AsRef<Path>, layout: &CsvLayout) -> Result<Self, ItemError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut store = Self::from_writer(file, layout)?;
        store.label = format!("CSV file {}", path.display());
        Ok(store)
    }
}

impl<W: io::Write> CsvItemStore<W> {
    pub fn from_writer(writer: W, layout: &CsvLayout) -> Result<Self, ItemError> {
        let writer = csv::WriterBuilder::new()
            .delimiter(layout.delimiter_byte()?)
            .from_writer(writer);
        let columns = [
            layout.item_column,
            layout.attribute_name_column,
            layout.attribute_value_column,
        ];
        let width = columns.iter().max().map_or(0, |last| last + 1);
        let mut store = Self {
            writer,
            columns,
            width,
            label: "CSV stream".to_string(),
            rows: 0,
        };
        if layout.has_headers {
            store.write_fields(HEADERS)?;
        }
        Ok(store)
    }

    fn write_fields(&mut self, fields: [&str; 3]) -> Result<(), ItemError> {
        let mut record = vec![""; self.width];
        for (column, field) in self.columns.into_iter().zip(fields) {
            record[column] = field;
        }
        self.writer.write_record(&record)?;
        Ok(())
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, ItemError> {
        self.writer
            .into_inner()
            .map_err(|error| ItemError::Io(error.into_error()))
    }
}

impl<W: io::Write> ItemStore for CsvItemStore<W> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn store_item(&mut self, item: &Item) -> Result<(), ItemError> {
        for attribute in &item.attributes {
            self.write_fields([&item.name, &attribute.name, &attribute.value])?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ItemError> {
        self.writer.flush()?;
        debug!(store = %self.label, rows = self.rows, "csv store flushed");
        Ok(())
    }
}
