use anyhow::Context;
use hubcore::geo::WindowPolicy;
use hubcore::index::AirportIndex;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opens an airport list and builds the index. An unreadable file aborts the run.
pub fn load_index(path: &Path, policy: WindowPolicy) -> anyhow::Result<AirportIndex> {
    let file = File::open(path)
        .with_context(|| format!("opening airport list {}", path.display()))?;
    let index = AirportIndex::load(BufReader::new(file), policy)
        .with_context(|| format!("reading airport list {}", path.display()))?;
    info!(
        "loaded {} airports from {} ({} lines skipped, {} window)",
        index.len(),
        path.display(),
        index.skipped_lines(),
        policy
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_index_reads_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"New York,JFK,40.64,-73.78\nChicago,ORD,41.97\n")
            .unwrap();
        let index = load_index(temp.path(), WindowPolicy::FixedDegrees).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped_lines(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_index(&dir.path().join("absent.txt"), WindowPolicy::FixedDegrees)
            .unwrap_err();
        assert!(err.to_string().contains("opening airport list"));
    }
}
