use std::fs::File;
use std::io;
use std::path::Path;

use accum_core::{AccumulateError, Accumulator, BoxError};
use csv::StringRecord;
use tracing::debug;

use super::ItemSource;
use crate::error::ItemError;
use crate::layout::CsvLayout;
use crate::model::{Attribute, Item};

/// Reads items from a CSV file whose rows are grouped by item name.
///
/// Each row carries one attribute of one item. Contiguous rows with the same
/// item name are folded into a single [`Item`]; contiguous duplicate attribute
/// rows collapse into one attribute. Rows must already be grouped by item
/// name; enable [`CsvLayout::check_grouping`] to fail on input that is not.
pub struct CsvItemSource<Rd: io::Read> {
    reader: csv::Reader<Rd>,
    layout: CsvLayout,
    label: String,
}

impl CsvItemSource<File> {
    pub fn from_path(path: impl AsRef<Path>, layout: CsvLayout) -> Result<Self, ItemError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut source = Self::from_reader(file, layout)?;
        source.label = format!("CSV file {}", path.display());
        Ok(source)
    }
}

impl<Rd: io::Read> CsvItemSource<Rd> {
    pub fn from_reader(reader: Rd, layout: CsvLayout) -> Result<Self, ItemError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(layout.has_headers)
            .delimiter(layout.delimiter_byte()?)
            .flexible(true)
            .from_reader(reader);
        Ok(Self {
            reader,
            layout,
            label: "CSV stream".to_string(),
        })
    }

    pub fn layout(&self) -> &CsvLayout {
        &self.layout
    }
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|position| position.line()).unwrap_or_default()
}

fn required(row: &StringRecord, column: usize) -> Result<String, BoxError> {
    row.get(column)
        .map(str::to_string)
        .ok_or_else(|| format!("line {}: no column {column}", line_of(row)).into())
}

fn optional(row: &StringRecord, column: usize) -> &str {
    row.get(column).unwrap_or_default()
}

impl<Rd: io::Read> ItemSource for CsvItemSource<Rd> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn iterate_items(
        &mut self,
        consumer: &mut dyn FnMut(Item) -> Result<(), ItemError>,
    ) -> Result<u64, ItemError> {
        let item_column = self.layout.item_column;
        let name_column = self.layout.attribute_name_column;
        let value_column = self.layout.attribute_value_column;

        let attributes = Accumulator::nested(
            move |row: &StringRecord| {
                Ok((
                    optional(row, name_column).to_string(),
                    optional(row, value_column).to_string(),
                ))
            },
            |attribute: &Attribute| (attribute.name.clone(), attribute.value.clone()),
            move |row: &StringRecord| {
                let name = optional(row, name_column);
                if name.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Attribute::new(name, optional(row, value_column))))
            },
        )
        .with_post_build(|attribute: &mut Attribute, item: &mut Item| {
            item.attributes.push(attribute.clone());
            Ok(())
        });

        let mut items = Accumulator::new(
            move |row: &StringRecord| required(row, item_column),
            |item: &Item| item.name.clone(),
            move |row: &StringRecord| {
                let name = required(row, item_column)?;
                if name.is_empty() {
                    debug!(line = line_of(row), "row without item name skipped");
                    return Ok(None);
                }
                Ok(Some(Item::new(name)))
            },
        )
        .with_chained(attributes)
        .with_emitter(|item: Item| consumer(item).map_err(BoxError::from));
        if self.layout.check_grouping {
            items = items.with_group_check();
        }

        let mut row = StringRecord::new();
        let mut rows = 0u64;
        while self.reader.read_record(&mut row)? {
            rows += 1;
            // The row key only runs against a current item, so a short row
            // that would start one is checked here.
            if items.is_empty() {
                required(&row, item_column).map_err(AccumulateError::RowKey)?;
            }
            items.accumulate(&row)?;
        }
        items.flush()?;

        let completed = items.completed();
        debug!(source = %self.label, rows, items = completed, "csv source drained");
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(csv: &str, layout: CsvLayout) -> Result<Vec<Item>, ItemError> {
        let mut source = CsvItemSource::from_reader(csv.as_bytes(), layout)?;
        let mut items = Vec::new();
        source.iterate_items(&mut |item: Item| {
            items.push(item);
            Ok(())
        })?;
        Ok(items)
    }

    #[test]
    fn folds_rows_into_items() {
        let csv = "\
ItemName,AttribName,AttribValue
1,Joe,Slim
1,Joe,Slim
2,Bob,Portly
2,Bob,Fish
";
        let items = read_all(csv, CsvLayout::default()).unwrap();
        assert_eq!(
            items,
            vec![
                Item::new("1").with_attribute("Joe", "Slim"),
                Item::new("2")
                    .with_attribute("Bob", "Portly")
                    .with_attribute("Bob", "Fish"),
            ]
        );
    }

    #[test]
    fn headerless_semicolon_layout_with_reordered_columns() {
        let csv = "color;red;a\nsize;L;a\ncolor;blue;b\n";
        let layout = CsvLayout::default()
            .with_headers(false)
            .with_delimiter(';')
            .with_columns(2, 0, 1);

        let items = read_all(csv, layout).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "a");
        assert_eq!(items[0].values_of("size").collect::<Vec<_>>(), vec!["L"]);
        assert_eq!(items[1].attributes, vec![Attribute::new("color", "blue")]);
    }

    #[test]
    fn item_only_rows_produce_items_without_attributes() {
        let csv = "ItemName\nlonely\nother,k,v\n";
        let items = read_all(csv, CsvLayout::default()).unwrap();
        assert_eq!(items[0], Item::new("lonely"));
        assert_eq!(items[1], Item::new("other").with_attribute("k", "v"));
    }

    #[test]
    fn rows_without_item_name_are_skipped() {
        let csv = "ItemName,AttribName,AttribValue\n,orphan,x\n1,a,b\n";
        let items = read_all(csv, CsvLayout::default()).unwrap();
        assert_eq!(items, vec![Item::new("1").with_attribute("a", "b")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let items = read_all("ItemName,AttribName,AttribValue\n", CsvLayout::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn ungrouped_input_fails_when_checked() {
        let csv = "ItemName,AttribName,AttribValue\na,k,1\nb,k,2\na,k,3\n";

        let unchecked = read_all(csv, CsvLayout::default()).unwrap();
        assert_eq!(unchecked.len(), 3);

        let error = read_all(csv, CsvLayout::default().with_check_grouping(true)).unwrap_err();
        assert!(matches!(
            error,
            ItemError::Accumulate(AccumulateError::GroupReopened { .. })
        ));
    }

    #[test]
    fn short_first_row_is_a_row_key_error() {
        let layout = CsvLayout::default()
            .with_headers(false)
            .with_columns(3, 0, 1);

        let error = read_all("k,v\n", layout).unwrap_err();
        assert!(matches!(
            error,
            ItemError::Accumulate(AccumulateError::RowKey(_))
        ));
    }

    #[test]
    fn consumer_error_is_returned_unchanged() {
        let csv = "ItemName,AttribName,AttribValue\na,k,1\nb,k,2\n";
        let mut source = CsvItemSource::from_reader(csv.as_bytes(), CsvLayout::default()).unwrap();

        let error = source
            .iterate_items(&mut |_: Item| Err(ItemError::Layout("stop".to_string())))
            .unwrap_err();
        assert!(matches!(error, ItemError::Layout(message) if message == "stop"));
    }

    #[test]
    fn describe_names_the_stream() {
        let source = CsvItemSource::from_reader(&b""[..], CsvLayout::default()).unwrap();
        assert_eq!(source.describe(), "CSV stream");
        assert_eq!(source.layout(), &CsvLayout::default());
    }
}
