use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("no payload provided: pass --file, an inline JSON argument, or pipe JSON on stdin")]
    NoPayload,

    #[error("could not read payload file {path:?}: {source}")]
    PayloadFile { path: PathBuf, source: io::Error },

    #[error("could not connect to {address}: {source}")]
    Connect { address: String, source: io::Error },

    #[error("invocation failed: {message}")]
    Invocation { message: String },

    #[error("wire error: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HarnessError {
    /// Expected user errors exit 2, runtime failures exit 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::NoPayload | HarnessError::PayloadFile { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
