//! Column layout of item CSV files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ItemError;

/// Header written by the CSV store.
pub const HEADERS: [&str; 3] = ["ItemName", "AttribName", "AttribValue"];

/// Where item and attribute fields live in a CSV row.
///
/// The defaults match the files written by [`crate::CsvItemStore`]: a header
/// line, then `ItemName,AttribName,AttribValue` rows grouped by item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLayout {
    pub item_column: usize,
    pub attribute_name_column: usize,
    pub attribute_value_column: usize,
    pub delimiter: char,
    pub has_headers: bool,
    /// Fail on an item name that reappears after its group was completed,
    /// instead of silently emitting a second item with that name.
    pub check_grouping: bool,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            item_column: 0,
            attribute_name_column: 1,
            attribute_value_column: 2,
            delimiter: ',',
            has_headers: true,
            check_grouping: false,
        }
    }
}

impl CsvLayout {
    pub fn with_columns(mut self, item: usize, attribute_name: usize, attribute_value: usize) -> Self {
        self.item_column = item;
        self.attribute_name_column = attribute_name;
        self.attribute_value_column = attribute_value;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_check_grouping(mut self, check_grouping: bool) -> Self {
        self.check_grouping = check_grouping;
        self
    }

    /// Parse a layout from JSON. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ItemError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ItemError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ItemError> {
        if !self.delimiter.is_ascii() {
            return Err(ItemError::Layout(format!(
                "delimiter {:?} is not a single-byte character",
                self.delimiter
            )));
        }
        if self.attribute_name_column == self.attribute_value_column {
            return Err(ItemError::Layout(
                "attribute name and value must come from different columns".to_string(),
            ));
        }
        if self.item_column == self.attribute_name_column
            || self.item_column == self.attribute_value_column
        {
            return Err(ItemError::Layout(format!(
                "item column {} is also an attribute column",
                self.item_column
            )));
        }
        Ok(())
    }

    pub(crate) fn delimiter_byte(&self) -> Result<u8, ItemError> {
        self.validate()?;
        Ok(self.delimiter as u8)
    }
}
