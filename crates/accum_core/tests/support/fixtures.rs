#![allow(dead_code)]

use accum_core::Accumulator;

use super::{column, Row};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Parent entity with an attribute collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: String,
    pub attributes: Vec<Attribute>,
}

impl Record {
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Root accumulator grouping records on column 0.
pub fn records<'a>() -> Accumulator<'a, (), Record, Row, String> {
    Accumulator::new(
        |row: &Row| column(row, 0),
        |record: &Record| record.id.clone(),
        |row: &Row| {
            Ok(Some(Record {
                id: column(row, 0)?,
                attributes: Vec::new(),
            }))
        },
    )
}

/// Child accumulator grouping attributes on columns 1 and 2 concatenated,
/// appending each new attribute to the parent record as soon as it is built.
pub fn appended_attributes<'a>() -> Accumulator<'a, Record, Attribute, Row, String> {
    Accumulator::nested(
        |row: &Row| Ok(format!("{}{}", column(row, 1)?, column(row, 2)?)),
        |attribute: &Attribute| format!("{}{}", attribute.name, attribute.value),
        |row: &Row| {
            Ok(Some(Attribute {
                name: column(row, 1)?,
                value: column(row, 2)?,
            }))
        },
    )
    .with_post_build(|attribute: &mut Attribute, record: &mut Record| {
        record.attributes.push(attribute.clone());
        Ok(())
    })
}

/// Person -> Order -> Line, for three-level nesting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Customer {
    pub name: String,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Order {
    pub number: String,
    pub lines: Vec<String>,
}
