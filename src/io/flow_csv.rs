//! CSV line protocol for flow records.
//!
//! One header line followed by one row per record; timestamps are RFC 3339
//! UTC instants with millisecond precision (`2026-10-17T08:00:00.000Z`).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serializer};

use crate::error::{Error, Result};
use crate::sim::types::FlowRecord;

/// Protocol column header.
pub const HEADER: [&str; 5] = ["station_id", "station_name", "timestamp", "entries", "exits"];

#[derive(Debug, Deserialize)]
struct FlowRow {
    station_id: String,
    station_name: String,
    timestamp: String,
    entries: u32,
    exits: u32,
}

/// Formats an instant the way the protocol writes timestamps.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` helper so JSON output uses the same timestamp form as CSV.
pub fn serialize_timestamp<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

/// Writes records as protocol CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_flow_csv(records: &[FlowRecord], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for r in records {
        let timestamp = format_timestamp(&r.timestamp);
        let entries = r.entries.to_string();
        let exits = r.exits.to_string();
        wtr.write_record([
            r.station_id.as_str(),
            r.station_name.as_str(),
            timestamp.as_str(),
            entries.as_str(),
            exits.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes records as protocol CSV to a file at `path`.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_flow_csv(records: &[FlowRecord], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_flow_csv(records, io::BufWriter::new(file))
}

/// Parses protocol CSV back into records, preserving row order.
///
/// Empty input yields no records.
///
/// # Errors
///
/// Returns [`Error::Generation`] naming the offending line when the header
/// does not match, a row is short, a count is not a non-negative integer, or
/// a timestamp is not RFC 3339.
pub fn read_flow_csv(reader: impl Read) -> Result<Vec<FlowRecord>> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().map(str::trim).eq(HEADER) {
        return Err(Error::Generation(format!(
            "line 1: unexpected flow header `{}`",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for (index, row) in rdr.deserialize::<FlowRow>().enumerate() {
        let line = index + 2;
        let row = row.map_err(|e| Error::Generation(format!("line {line}: {e}")))?;
        let timestamp = DateTime::parse_from_rfc3339(row.timestamp.trim())
            .map_err(|e| {
                Error::Generation(format!(
                    "line {line}: invalid timestamp `{}`: {e}",
                    row.timestamp
                ))
            })?
            .with_timezone(&Utc);
        records.push(FlowRecord {
            station_id: row.station_id,
            station_name: row.station_name,
            timestamp,
            entries: row.entries,
            exits: row.exits,
        });
    }

    Ok(records)
}
