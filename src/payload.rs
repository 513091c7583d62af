use std::fs;
use std::io::{IsTerminal, Read};

use crate::cli::Cli;
use crate::error::{HarnessError, Result};

/// Resolve the payload bytes for this run, or fail before anything touches
/// the network.
///
/// Precedence is fixed: an explicit `--file` wins, then the inline JSON
/// argument, then piped stdin. An empty result from whichever source applied
/// is treated the same as no source at all.
pub fn resolve(cli: &Cli) -> Result<Vec<u8>> {
    let bytes = if let Some(path) = &cli.file {
        fs::read(path).map_err(|source| HarnessError::PayloadFile {
            path: path.clone(),
            source,
        })?
    } else if let Some(inline) = &cli.payload {
        inline.clone().into_bytes()
    } else {
        read_stdin()?
    };

    if bytes.is_empty() {
        return Err(HarnessError::NoPayload);
    }
    Ok(bytes)
}

fn read_stdin() -> Result<Vec<u8>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        // Interactive session with no file or inline payload; don't sit
        // waiting on a terminal read.
        return Ok(Vec::new());
    }
    let mut bytes = Vec::new();
    stdin.lock().read_to_end(&mut bytes)?;
    Ok(bytes)
}
