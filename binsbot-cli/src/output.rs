use std::io::{self, Write};

use binsbot_core::model::Collection;
use chrono::NaiveDate;

pub(crate) fn write_schedule(
    out: &mut impl Write,
    collections: &[Collection],
    today: NaiveDate,
) -> io::Result<()> {
    if collections.is_empty() {
        return writeln!(out, "No collections scheduled.");
    }
    for collection in collections {
        write_collection(out, collection, today)?;
    }
    Ok(())
}

pub(crate) fn write_collection(
    out: &mut impl Write,
    collection: &Collection,
    today: NaiveDate,
) -> io::Result<()> {
    let (date, relative) = if collection.is_unscheduled() {
        ("unscheduled".to_owned(), String::new())
    } else {
        let day = collection.start.date_naive();
        (
            collection.start.format("%a %d %b %Y").to_string(),
            relative_day_label(day, today),
        )
    };

    writeln!(out, "{date:<15}  {relative:<12}  {}", bins_label(collection))
}

fn bins_label(collection: &Collection) -> String {
    if collection.bin_types.is_empty() {
        return "(no known bins)".to_owned();
    }
    collection
        .bin_types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".to_owned(),
        1 => "tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        -1 => "yesterday".to_owned(),
        days => format!("{} days ago", days.abs()),
    }
}
