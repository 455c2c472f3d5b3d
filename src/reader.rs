//! Raw sample input
//!
//! One reading per line, first three comma or whitespace separated integers,
//! anything after them ignored. Files ending in `.gz` are decompressed on the
//! fly.

use flate2::read::GzDecoder;
use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{CalResult, CalibrationError};
use crate::types::RawSample;

/// Buffered reader over `path`, or stdin when no path is given
pub fn open_input(path: Option<&Path>) -> CalResult<Box<dyn BufRead>> {
    let Some(path) = path else {
        return Ok(Box::new(BufReader::new(io::stdin())));
    };

    let file = File::open(path)?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str, line_number: usize) -> CalResult<Option<RawSample>> {
    let mut fields = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .peekable();

    if fields.peek().is_none() {
        return Ok(None);
    }

    let malformed = || CalibrationError::MalformedRecord {
        line: line_number,
        content: line.trim_end().to_string(),
    };

    let mut coords = [0i32; 3];
    for slot in coords.iter_mut() {
        let field = fields.next().ok_or_else(malformed)?;
        *slot = field.parse().map_err(|_| malformed())?;
    }

    Ok(Some(RawSample::new(coords[0], coords[1], coords[2])))
}

/// Read every sample from `reader`. At least one sample is required.
pub fn read_samples<R: BufRead>(reader: R) -> CalResult<Vec<RawSample>> {
    let mut samples = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(sample) = parse_line(&line, i + 1)? {
            samples.push(sample);
        }
    }

    if samples.is_empty() {
        return Err(CalibrationError::EmptySampleSet);
    }
    debug!("read {} samples", samples.len());
    Ok(samples)
}

/// Drop repeated readings, keeping the first occurrence of each
pub fn dedup_samples(samples: &[RawSample]) -> Vec<RawSample> {
    let mut seen = HashSet::with_capacity(samples.len());
    samples.iter().copied().filter(|s| seen.insert(*s)).collect()
}
