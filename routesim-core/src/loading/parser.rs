use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::records::Scenario;
use crate::Error;

/// Reads a scenario from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid scenario JSON
pub fn read_scenario(path: &Path) -> Result<Scenario, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
