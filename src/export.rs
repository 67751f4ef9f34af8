// 📤 Roster Export - dated spreadsheet file and text summary

use crate::swimmer::Swimmer;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const COLUMNS: [&str; 6] = [
    "Name",
    "Birth year",
    "Competition",
    "Event",
    "Entry time",
    "Registration date",
];

/// `registrations_DD-MM-YYYY.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("registrations_{}.csv", date.format("%d-%m-%Y"))
}

/// Write the header row and one row per swimmer, in roster order.
pub fn write_roster_csv<W: Write>(writer: W, swimmers: &[Swimmer]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for swimmer in swimmers {
        let birth_year = swimmer.birth_year.to_string();
        let registered = swimmer.registration_date();
        wtr.write_record([
            swimmer.name.as_str(),
            birth_year.as_str(),
            swimmer.competition.as_str(),
            swimmer.event.as_str(),
            swimmer.entry_time.as_str(),
            registered.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export the roster into `dir`, returning the path of the written file.
pub fn export_roster(dir: &Path, swimmers: &[Swimmer], date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_filename(date));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_roster_csv(file, swimmers)?;

    info!(path = %path.display(), rows = swimmers.len(), "roster exported");
    Ok(path)
}

/// Plain-text roster, numbered, with a closing total.
pub fn roster_summary(swimmers: &[Swimmer]) -> String {
    let mut out = String::from("Hello,\n\nHere are the swimming registrations:\n\n");

    let entries: Vec<String> = swimmers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {} ({})\n   Competition: {}\n   Event: {}\n   Entry time: {}\n   ---",
                i + 1,
                s.name,
                s.birth_year,
                s.competition,
                s.event,
                s.entry_time
            )
        })
        .collect();
    out.push_str(&entries.join("\n\n"));

    out.push_str(&format!(
        "\n\nTotal: {} registered athlete(s)\n\nBest regards",
        swimmers.len()
    ));
    out
}
