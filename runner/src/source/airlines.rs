use hubcore::enrichment::{AirlineDirectory, AirlineTable, NoAirlineDirectory};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Loads the airline table, falling back to an empty directory when the
/// file cannot be read. Carriers are then reported without names.
pub fn load_directory(path: &Path) -> Box<dyn AirlineDirectory> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let (table, ignored) = AirlineTable::from_lines(contents.lines());
            info!(
                "loaded {} airlines from {} ({} lines ignored)",
                table.len(),
                path.display(),
                ignored
            );
            Box::new(table)
        }
        Err(err) => {
            warn!(
                "airline table {} unavailable ({}); carriers will be reported without names",
                path.display(),
                err
            );
            Box::new(NoAirlineDirectory)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_directory_reads_table() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"DAL,Delta Air Lines\nUAL,United Airlines\n").unwrap();
        let directory = load_directory(temp.path());
        assert_eq!(directory.lookup("UAL").as_deref(), Some("United Airlines"));
    }

    #[test]
    fn unreadable_table_degrades_to_no_names() {
        let dir = tempfile::tempdir().unwrap();
        let directory = load_directory(&dir.path().join("missing.csv"));
        assert_eq!(directory.lookup("DAL"), None);
    }
}
