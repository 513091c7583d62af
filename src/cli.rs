use std::path::PathBuf;

use clap::Parser;

/// Command-line surface of the harness client.
///
/// Parsed once in `main` and threaded through the run; there is no other
/// process-wide configuration state.
#[derive(Parser, Debug)]
#[command(name = "run-lambda")]
#[command(about = "Invoke a locally running Lambda RPC harness with a JSON payload", long_about = None)]
pub struct Cli {
    /// Invocation deadline in seconds, forwarded in the request
    #[arg(short, long, default_value_t = 300)]
    pub timeout: i64,

    /// Path to a JSON payload file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Inline JSON payload, used when no --file is given
    pub payload: Option<String>,
}
