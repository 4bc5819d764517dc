//! Example: fold a denormalized person/dish table into people with dish lists.
//!
//! Run with `RUST_LOG=trace` to watch every transition.

use accum_core::{AccumulateError, Accumulator};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Person {
    id: u32,
    name: String,
    dishes: Vec<String>,
}

type Row = (u32, &'static str, &'static str, &'static str);

const ROWS: [Row; 5] = [
    (1, "Slim", "Joe", "Chicken"),
    (1, "Slim", "Joe", "Chicken"),
    (2, "Portly", "Bob", "Steak"),
    (2, "Portly", "Bob", "Fish"),
    (2, "Portly", "Bob", "Spinach"),
];

fn main() -> Result<(), AccumulateError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dishes = Accumulator::nested(
        |row: &Row| Ok(row.3.to_string()),
        |dish: &String| dish.clone(),
        |row: &Row| Ok(Some(row.3.to_string())),
    )
    .with_into_parent(|dish: String, person: &mut Person| {
        person.dishes.push(dish);
        Ok(())
    });

    let mut people = Accumulator::new(
        |row: &Row| Ok(row.0),
        |person: &Person| person.id,
        |row: &Row| {
            Ok(Some(Person {
                id: row.0,
                name: format!("{} {}", row.2, row.1),
                dishes: Vec::new(),
            }))
        },
    )
    .with_chained(dishes)
    .with_emitter(|person: Person| {
        println!(
            "Person {{{}, {}}} with dishes {:?}",
            person.id, person.name, person.dishes
        );
        Ok(())
    });

    let completed = people.run(ROWS)?;
    println!("{completed} people built from {} rows", ROWS.len());
    Ok(())
}
