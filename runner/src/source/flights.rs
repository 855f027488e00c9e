use anyhow::{bail, Context};
use hubcore::records::FlightRecord;
use log::{info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Column names of one state vector, in feed order.
pub const STATE_VECTOR_FIELDS: [&str; 17] = [
    "icao24",
    "callsign",
    "origin_country",
    "time_position",
    "last_contact",
    "longitude",
    "latitude",
    "baro_altitude",
    "on_ground",
    "velocity",
    "true_track",
    "vertical_rate",
    "sensors",
    "geo_altitude",
    "squawk",
    "spi",
    "position_source",
];

const CALL_SIGN_COLUMN: usize = 1;
const LONGITUDE_COLUMN: usize = 5;
const LATITUDE_COLUMN: usize = 6;
/// Rows must reach the latitude column to be usable.
const MIN_STATE_FIELDS: usize = LATITUDE_COLUMN + 1;

#[derive(Debug, Default)]
pub struct DecodedFlights {
    pub records: Vec<FlightRecord>,
    /// Rows that could not be turned into a record at all.
    pub skipped: usize,
}

/// Renders a JSON value the way the feed's text form shows it; `null`
/// becomes the literal `null`.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn column_name(position: usize) -> String {
    STATE_VECTOR_FIELDS
        .get(position)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("field_{}", position))
}

fn record_from_row(row: &[Value]) -> Option<FlightRecord> {
    if row.len() < MIN_STATE_FIELDS {
        return None;
    }
    let mut record = FlightRecord::new(
        render(&row[CALL_SIGN_COLUMN]),
        Some(render(&row[LONGITUDE_COLUMN])),
        Some(render(&row[LATITUDE_COLUMN])),
    );
    for (position, value) in row.iter().enumerate() {
        if matches!(position, CALL_SIGN_COLUMN | LONGITUDE_COLUMN | LATITUDE_COLUMN) {
            continue;
        }
        record.passthrough.insert(column_name(position), render(value));
    }
    Some(record)
}

fn record_from_object(object: &Map<String, Value>) -> Option<FlightRecord> {
    let call_sign = ["callsign", "call_sign", "callSign"]
        .iter()
        .find_map(|key| object.get(*key))?;
    let mut record = FlightRecord::new(
        render(call_sign),
        object.get("longitude").map(render),
        object.get("latitude").map(render),
    );
    for (key, value) in object {
        if matches!(
            key.as_str(),
            "callsign" | "call_sign" | "callSign" | "longitude" | "latitude"
        ) {
            continue;
        }
        record.passthrough.insert(key.clone(), render(value));
    }
    Some(record)
}

fn record_from_value(value: &Value) -> Option<FlightRecord> {
    match value {
        Value::Array(row) => record_from_row(row),
        Value::Object(object) => record_from_object(object),
        _ => None,
    }
}

fn decode_rows<'a, I>(rows: I) -> DecodedFlights
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut decoded = DecodedFlights::default();
    for row in rows {
        match record_from_value(row) {
            Some(record) => decoded.records.push(record),
            None => decoded.skipped += 1,
        }
    }
    decoded
}

fn decode_lines(text: &str) -> DecodedFlights {
    let mut decoded = DecodedFlights::default();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line)
            .ok()
            .as_ref()
            .and_then(record_from_value)
        {
            Some(record) => decoded.records.push(record),
            None => {
                warn!("flight line {} could not be decoded; skipped", number + 1);
                decoded.skipped += 1;
            }
        }
    }
    decoded
}

/// Decodes either a `{"time": .., "states": [..]}` snapshot, a bare array
/// of rows, or JSON Lines with one row per line.
pub fn decode_flights(text: &str) -> anyhow::Result<DecodedFlights> {
    match serde_json::from_str::<Value>(text) {
        Ok(document @ Value::Object(_)) => match document.get("states") {
            Some(Value::Array(states)) => Ok(decode_rows(states)),
            // An empty snapshot carries `"states": null`.
            Some(Value::Null) => Ok(DecodedFlights::default()),
            Some(_) => bail!("\"states\" is not an array"),
            None => Ok(decode_rows(std::iter::once(&document))),
        },
        Ok(Value::Array(rows)) => {
            if rows.iter().all(|row| row.is_array() || row.is_object()) {
                Ok(decode_rows(&rows))
            } else {
                // A single state vector on its own.
                Ok(decode_rows(std::iter::once(&Value::Array(rows))))
            }
        }
        Ok(other) => bail!("unsupported flight document: {}", other),
        Err(_) => Ok(decode_lines(text)),
    }
}

pub fn read_flights(path: &Path) -> anyhow::Result<DecodedFlights> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading flight feed {}", path.display()))?;
    let decoded = decode_flights(&text)
        .with_context(|| format!("decoding flight feed {}", path.display()))?;
    info!(
        "decoded {} flight records from {} ({} rows skipped)",
        decoded.records.len(),
        path.display(),
        decoded.skipped
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "time": 1681063200,
        "states": [
            ["a808c5", "DAL123  ", "United States", 1681063199, 1681063199,
             -73.90, 40.70, 1120.14, false, 98.2, 270.0, -3.9, null, 1150.0, "2241", false, 0],
            ["ac96b8", null, "United States", null, 1681063190,
             null, null, null, true, 0.0, 0.0, null, null, null, null, false, 0],
            ["short", "UAL9"]
        ]
    }"#;

    #[test]
    fn snapshot_rows_become_records() {
        let decoded = decode_flights(SNAPSHOT).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.skipped, 1);

        let first = &decoded.records[0];
        assert_eq!(first.call_sign, "DAL123  ");
        assert_eq!(first.longitude.as_deref(), Some("-73.9"));
        assert_eq!(first.latitude.as_deref(), Some("40.7"));
        assert_eq!(first.field("icao24"), Some("a808c5"));
        assert_eq!(first.field("squawk"), Some("2241"));
        assert_eq!(first.field("sensors"), Some("null"));
    }

    #[test]
    fn json_null_renders_as_placeholder() {
        let decoded = decode_flights(SNAPSHOT).unwrap();
        let second = &decoded.records[1];
        assert_eq!(second.call_sign, "null");
        assert_eq!(second.longitude.as_deref(), Some("null"));
    }

    #[test]
    fn json_lines_are_decoded_individually() {
        let text = "[\"a1\", \"SWA42\", \"US\", 0, 0, -84.4, 33.6]\n\
                    not json\n\
                    {\"callsign\": \"JBU7\", \"latitude\": 40.6, \"velocity\": 80}\n";
        let decoded = decode_flights(text).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.records[0].call_sign, "SWA42");
        assert_eq!(decoded.records[1].longitude, None);
        assert_eq!(decoded.records[1].field("velocity"), Some("80"));
    }

    #[test]
    fn single_row_and_empty_snapshot() {
        let single = decode_flights("[\"a1\", \"SWA42\", \"US\", 0, 0, -84.4, 33.6]").unwrap();
        assert_eq!(single.records.len(), 1);

        let empty = decode_flights("{\"time\": 0, \"states\": null}").unwrap();
        assert!(empty.records.is_empty());
        assert!(decode_flights("{\"states\": 4}").is_err());
    }
}
