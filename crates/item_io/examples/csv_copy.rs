//! Regroup an item CSV file and write it back out.
//!
//! Reads `ItemName,AttribName,AttribValue` rows, folds them into items
//! (collapsing repeated attribute rows) and writes the result to a new file.
//! Without `--input` a small sample file is generated first.
//!
//! ```sh
//! cargo run --example csv_copy -p item_io -- --input items.csv --output copy.csv
//! ```
//!
//! An optional `--layout layout.json` describes non-default files, e.g.
//! `{"delimiter": ";", "has_headers": false, "check_grouping": true}`.

use std::error::Error;

use item_io::{transfer, CsvItemSource, CsvItemStore, CsvLayout, TransferOptions};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "\
ItemName,AttribName,AttribValue
1,Joe,Slim
1,Joe,Slim
1,dish,Chicken
2,Bob,Portly
2,dish,Steak
2,dish,Fish
2,dish,Fish
";

fn arg(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let layout = match arg("--layout") {
        Some(path) => CsvLayout::from_json_file(path)?,
        None => CsvLayout::default(),
    };
    let input = match arg("--input") {
        Some(path) => path,
        None => {
            let path = std::env::temp_dir().join("item_io_sample.csv");
            std::fs::write(&path, SAMPLE)?;
            path.display().to_string()
        }
    };
    let output = arg("--output").unwrap_or_else(|| "items_copy.csv".to_string());

    println!("Item CSV copy");
    println!("=============");
    println!("Input:  {}", input);
    println!("Output: {}", output);
    println!();

    let mut source = CsvItemSource::from_path(&input, layout.clone())?;
    let mut store = CsvItemStore::create(&output, &layout)?;
    let stats = transfer(&mut source, &mut store, &TransferOptions::default())?;

    println!(
        "Copied {} items with {} attributes ({} rows written).",
        stats.items,
        stats.attributes,
        store.rows()
    );
    Ok(())
}
