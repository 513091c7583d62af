use serde_json::Value;

use crate::cli::Cli;
use crate::client::{self, InvokeClient};
use crate::error::{HarnessError, Result};
use crate::payload;
use crate::rpc::InvokeRequest;

/// One full run: resolve the payload, build the request, connect, call,
/// report. Every failure propagates to `main`, which owns the exit code.
pub async fn run(cli: Cli) -> Result<()> {
    let payload = payload::resolve(&cli)?;
    let request = InvokeRequest::new(payload, cli.timeout);

    let address = client::server_address();
    log::info!("Test harness connecting to: {address}");
    let mut client = InvokeClient::connect(&address).await?;

    let reply = client.invoke(&request).await?;
    if let Some(message) = reply.error {
        log::error!("Invocation: {message}");
        log::error!("Response: {}", render(&reply.result));
        return Err(HarnessError::Invocation { message });
    }

    log::info!("Response: {}", render(&reply.result));
    Ok(())
}

fn render(result: &Option<Value>) -> String {
    match result {
        Some(value) => value.to_string(),
        None => "null".to_string(),
    }
}
