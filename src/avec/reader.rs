//! Path-based decoder implementation.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use tracing::debug;

use crate::{exercise::Exercise, sans};

use super::ParseError;

/// Largest length a document header can declare.
const MAX_LEN: u64 = u16::MAX as u64;

/// Parse the exercise recorded in a file.
///
/// The file is closed before returning, whether or not parsing succeeds.
pub fn parse_exercise(path: impl AsRef<Path>) -> Result<Exercise, ParseError> {
    let path = path.as_ref();

    let bytes = read(path).map_err(|err| ParseError::new(path, err))?;
    let exercise = sans::decode(&bytes).map_err(|err| ParseError::new(path, err))?;

    debug!(
        path = %path.display(),
        file_type = ?exercise.file_type(),
        laps = exercise.laps().len(),
        samples = exercise.samples().len(),
        "Parsed exercise file."
    );

    Ok(exercise)
}

/// Read a file, stopping one byte past the largest declarable length so that
/// oversized files are still rejected by their length check.
fn read(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;

    let mut bytes = Vec::new();
    file.take(MAX_LEN + 1).read_to_end(&mut bytes)?;

    Ok(bytes)
}
