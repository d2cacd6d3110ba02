use std::{
    fs::{self, File},
    io::{self, Read},
};

use anyhow::{Context, Result};

pub mod check;
pub mod dump;
pub mod parse_error;
pub mod stats;

/// Reads the whole document from the file at `path` or from stdin if `path`
/// is `-`
pub fn read_document(path: &str) -> Result<String> {
    if path == "-" {
        let mut document = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut document)
            .context("Unable to read document from stdin")?;
        Ok(document)
    } else {
        fs::read_to_string(path).with_context(|| format!("Unable to read document `{path}'"))
    }
}

/// Opens the file at `path` or stdin if `path` is `-` for streaming
pub fn open_document(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Unable to open document `{path}'"))?;
    Ok(Box::new(file))
}
