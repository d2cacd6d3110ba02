use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use humantime::format_duration;
use tracing::info;
use xmlsax_core::Reader;

use super::{parse_error::IntoParseError, read_document};

/// Check if a document is well-formed
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The document to check (`-` for stdin)
    pub file: String,
}

/// Run the `check` command
pub fn run_check(args: CheckArgs) -> Result<()> {
    let document = read_document(&args.file)?;

    let start = Instant::now();
    let mut reader = Reader::from_str(&document);
    reader
        .run()
        .map_err(|err| err.into_parse_error(&document))?;
    info!(pos = %reader.source_position(), "reached end of document");

    eprintln!(
        "Document `{}' is well-formed (checked in {})",
        args.file,
        format_duration(Duration::from_millis(start.elapsed().as_millis() as u64))
    );

    Ok(())
}
