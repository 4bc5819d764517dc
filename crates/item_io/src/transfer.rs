//! Copy every item from a source into a store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ItemError;
use crate::model::Item;
use crate::retry::perform_with_retry;
use crate::source::ItemSource;
use crate::store::ItemStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOptions {
    /// Extra attempts for a failed `store_item` call before giving up.
    pub store_retries: u32,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self { store_retries: 3 }
    }
}

impl TransferOptions {
    pub fn with_store_retries(mut self, store_retries: u32) -> Self {
        self.store_retries = store_retries;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ItemError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ItemError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub items: u64,
    pub attributes: u64,
}

/// Stream all items of `source` into `store`, then finish the store.
///
/// Store failures are retried per item; a source failure or an exhausted
/// retry stops the transfer. Items stored before the failure stay stored.
pub fn transfer(
    source: &mut dyn ItemSource,
    store: &mut dyn ItemStore,
    options: &TransferOptions,
) -> Result<TransferStats, ItemError> {
    info!(
        source = %source.describe(),
        store = %store.describe(),
        retries = options.store_retries,
        "transfer started"
    );

    let mut stats = TransferStats::default();
    source.iterate_items(&mut |item: Item| {
        perform_with_retry(options.store_retries, |_| store.store_item(&item))?;
        stats.items += 1;
        stats.attributes += item.attributes.len() as u64;
        Ok(())
    })?;
    store.finish()?;

    info!(
        items = stats.items,
        attributes = stats.attributes,
        "transfer completed"
    );
    Ok(stats)
}
