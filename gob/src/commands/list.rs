use std::convert::TryFrom;
use std::path::PathBuf;

use gob_format::Entry;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::util::{format_size, open_archive};

#[derive(Serialize)]
struct JsonEntry {
    name: String,
    start: u32,
    size: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unsaved: bool,
}

impl From<&Entry> for JsonEntry {
    fn from(entry: &Entry) -> Self {
        JsonEntry {
            name: entry.name.to_string(),
            start: entry.start,
            size: entry.size(),
            unsaved: entry.is_fresh(),
        }
    }
}

pub fn run(path: PathBuf, extension: Option<String>, json: bool) -> Result<()> {
    let file = open_archive(&path)?;
    let archive = file.archive();

    let entries = match &extension {
        Some(ext) => archive.require_extension(ext)?,
        None => archive.iter().collect(),
    };

    if json {
        list_json(&entries)
    } else {
        print_table(&entries);
        Ok(())
    }
}

fn list_json(entries: &[&Entry]) -> Result<()> {
    let entries: Vec<JsonEntry> = entries.iter().map(|&entry| entry.into()).collect();
    let json = serde_json::to_string_pretty(&entries).map_err(Error::Json)?;
    println!("{}", json);
    Ok(())
}

/// Fresh entries are marked with `*`: their start is only provisional.
pub fn print_table(entries: &[&Entry]) {
    println!("{:>12}  {:>10}  Name", "Size", "Start");
    println!("{}", "-".repeat(40));

    let mut total = 0u64;
    for entry in entries {
        let marker = if entry.is_fresh() { "*" } else { " " };
        println!(
            "{:>12}  {:#010x}{} {}",
            format_size(entry.size()),
            entry.start,
            marker,
            entry.name
        );
        total += entry.size() as u64;
    }

    println!("{}", "-".repeat(40));
    println!(
        "{:>12}  {:>10}  {} entries",
        format_size(u32::try_from(total).unwrap_or(u32::MAX)),
        "",
        entries.len()
    );
}
