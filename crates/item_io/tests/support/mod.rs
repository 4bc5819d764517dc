#![allow(dead_code)]

use item_io::{Item, ItemError, ItemSource, ItemStore};

/// Route library events to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store that keeps items in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub items: Vec<Item>,
    pub finished: bool,
}

impl ItemStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn store_item(&mut self, item: &Item) -> Result<(), ItemError> {
        self.items.push(item.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ItemError> {
        self.finished = true;
        Ok(())
    }
}

/// Store whose first `failures` calls per item fail with an I/O error.
#[derive(Debug)]
pub struct FlakyStore {
    failures: u32,
    failed_for_current: u32,
    pub attempts: u32,
    pub inner: MemoryStore,
}

impl FlakyStore {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            failed_for_current: 0,
            attempts: 0,
            inner: MemoryStore::default(),
        }
    }
}

impl ItemStore for FlakyStore {
    fn describe(&self) -> String {
        format!("flaky({} failures per item)", self.failures)
    }

    fn store_item(&mut self, item: &Item) -> Result<(), ItemError> {
        self.attempts += 1;
        if self.failed_for_current < self.failures {
            self.failed_for_current += 1;
            return Err(ItemError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("store of {} timed out", item.name),
            )));
        }
        self.failed_for_current = 0;
        self.inner.store_item(item)
    }

    fn finish(&mut self) -> Result<(), ItemError> {
        self.inner.finish()
    }
}

/// Source that hands out a fixed list of items once.
#[derive(Debug)]
pub struct ReplaySource {
    items: Vec<Item>,
}

impl ReplaySource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl ItemSource for ReplaySource {
    fn describe(&self) -> String {
        format!("replay of {} items", self.items.len())
    }

    fn iterate_items(
        &mut self,
        consumer: &mut dyn FnMut(Item) -> Result<(), ItemError>,
    ) -> Result<u64, ItemError> {
        let mut produced = 0;
        for item in self.items.drain(..) {
            consumer(item)?;
            produced += 1;
        }
        Ok(produced)
    }
}
