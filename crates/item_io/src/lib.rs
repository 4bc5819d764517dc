//! Items and attributes moved between CSV files and stores.
//!
//! An item is a name plus a list of name/value attributes, the record shape of
//! key-value stores such as SimpleDB. In CSV each attribute is its own row:
//!
//! ```text
//! ItemName,AttribName,AttribValue
//! 1,Joe,Slim
//! 2,Bob,Portly
//! 2,Bob,Fish
//! ```
//!
//! [`CsvItemSource`] folds such rows back into items with a two-level
//! [`accum_core::Accumulator`], so files of any size are read in one pass.
//!
//! # Quick Start
//!
//! ```
//! use item_io::{transfer, CsvItemSource, CsvItemStore, CsvLayout, TransferOptions};
//!
//! let input = "ItemName,AttribName,AttribValue\n1,Joe,Slim\n1,Joe,Slim\n2,Bob,Fish\n";
//! let layout = CsvLayout::default();
//!
//! let mut source = CsvItemSource::from_reader(input.as_bytes(), layout.clone())?;
//! let mut store = CsvItemStore::from_writer(Vec::new(), &layout)?;
//! let stats = transfer(&mut source, &mut store, &TransferOptions::default())?;
//!
//! assert_eq!(stats.items, 2);
//! assert_eq!(stats.attributes, 2);
//! let output = String::from_utf8(store.into_inner()?).unwrap();
//! assert_eq!(output, "ItemName,AttribName,AttribValue\n1,Joe,Slim\n2,Bob,Fish\n");
//! # Ok::<(), item_io::ItemError>(())
//! ```
//!
//! # Architecture
//!
//! - [`model`]: `Item` and `Attribute`
//! - [`layout`]: CSV column layout, loadable from JSON
//! - [`source`] / [`store`]: the `ItemSource` and `ItemStore` seams and their CSV implementations
//! - [`transfer`](mod@transfer): source to store copy with per-item retry
//! - [`retry`]: bounded retry helper

pub mod error;
pub mod layout;
pub mod model;
pub mod retry;
pub mod source;
pub mod store;
pub mod transfer;

pub use error::ItemError;
pub use layout::{CsvLayout, HEADERS};
pub use model::{Attribute, Item};
pub use retry::{perform_with_retry, RetryExhausted};
pub use source::{CsvItemSource, ItemSource};
pub use store::{CsvItemStore, ItemStore};
pub use transfer::{transfer, TransferOptions, TransferStats};
