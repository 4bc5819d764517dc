mod support;

use accum_core::Accumulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::fixtures::{appended_attributes, records};
use support::{column, Collector, Row};

/// Grouped rows for `groups` items, each with 1..=4 attribute runs of 1..=3 rows.
///
/// Returns the rows and the number of contiguous (item, attribute) key runs.
fn grouped_rows(seed: u64, groups: usize) -> (Vec<Row>, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    for group in 0..groups {
        for run in 0..rng.gen_range(1..=4) {
            for _ in 0..rng.gen_range(1..=3) {
                rows.push(vec![
                    format!("item-{group}"),
                    format!("attr-{run}"),
                    format!("value-{}", rng.gen_range(0..2)),
                ]);
            }
        }
    }

    let mut runs = 0;
    let mut previous: Option<(&str, String)> = None;
    for row in &rows {
        let key = (row[0].as_str(), format!("{}{}", row[1], row[2]));
        if previous.as_ref() != Some(&key) {
            runs += 1;
        }
        previous = Some(key);
    }
    (rows, runs)
}

#[test]
fn emitted_count_equals_number_of_key_runs() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let groups = rng.gen_range(1..50);
        let (rows, _) = grouped_rows(seed, groups);

        let emitted = Collector::new();
        let mut root = Accumulator::new(
            |row: &Row| column(row, 0),
            |id: &String| id.clone(),
            |row: &Row| Ok(Some(column(row, 0)?)),
        )
        .with_emitter(emitted.sink());

        assert_eq!(root.run(rows).unwrap(), groups as u64, "seed {seed}");
        assert_eq!(emitted.len(), groups);
    }
}

#[test]
fn child_entities_match_contiguous_child_runs() {
    for seed in 0..20 {
        let (rows, child_runs) = grouped_rows(seed, 25);

        let emitted = Collector::new();
        let mut root = records()
            .with_chained(appended_attributes())
            .with_emitter(emitted.sink());
        root.run(rows).unwrap();

        let records = emitted.snapshot();
        assert_eq!(records.len(), 25, "seed {seed}");
        let attributes: usize = records.iter().map(|r| r.attributes.len()).sum();
        assert_eq!(attributes, child_runs, "seed {seed}");
    }
}

#[test]
fn emission_follows_first_row_order() {
    let (rows, _) = grouped_rows(7, 30);
    let expected: Vec<String> = rows.iter().fold(Vec::new(), |mut ids, row| {
        if ids.last() != Some(&row[0]) {
            ids.push(row[0].clone());
        }
        ids
    });

    let emitted = Collector::new();
    let mut root = records().with_emitter(emitted.sink());
    root.run(rows).unwrap();

    let ids: Vec<String> = emitted.snapshot().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, expected);
}
