use std::env;
use std::io;
use std::time::Duration;

use serde_json::Deserializer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{HarnessError, Result};
use crate::retry;
use crate::rpc::{InvokeRequest, RpcCall, RpcReply, INVOKE_METHOD};

/// Environment variable naming the TCP port of the invocation server.
pub const PORT_ENV: &str = "_LAMBDA_SERVER_PORT";

/// Wall-clock budget for getting a connection; attempts repeat at a fixed
/// interval until the budget is spent.
pub const CONNECT_BUDGET: Duration = Duration::from_secs(8);
pub const CONNECT_INTERVAL: Duration = Duration::from_millis(500);

pub const BUF_SIZE: usize = (u16::MAX as usize) + 1;

/// Address of the invocation server. With the port variable unset this
/// degenerates to `localhost:`, which can never connect; the retry budget
/// still applies and the run fails once it is spent.
pub fn server_address() -> String {
    let port = env::var(PORT_ENV).unwrap_or_default();
    format!("localhost:{port}")
}

/// Client holding one connection to the invocation server. Issues a single
/// call per run; only the connect is ever retried.
pub struct InvokeClient {
    stream: TcpStream,
    next_id: u64,
}

impl InvokeClient {
    /// Connect, retrying while the server process is still starting up.
    pub async fn connect(address: &str) -> Result<Self> {
        let stream = retry::with_deadline(CONNECT_BUDGET, CONNECT_INTERVAL, || {
            TcpStream::connect(address)
        })
        .await
        .map_err(|source| HarnessError::Connect {
            address: address.to_string(),
            source,
        })?;

        Ok(Self { stream, next_id: 0 })
    }

    /// Issue one `Function.Invoke` call and block until the reply envelope
    /// is complete. The call itself carries no timeout; the server's own
    /// invocation deadline governs timing.
    pub async fn invoke(&mut self, request: &InvokeRequest) -> Result<RpcReply> {
        let id = self.next_id;
        self.next_id += 1;

        let call = RpcCall {
            method: INVOKE_METHOD,
            params: (request,),
            id,
        };
        self.stream.write_all(&serde_json::to_vec(&call)?).await?;

        let reply = self.read_reply().await?;
        if reply.id != id {
            log::warn!("reply id {} does not match call id {id}", reply.id);
        }
        Ok(reply)
    }

    // The reply may arrive split across reads; accumulate until one complete
    // JSON value parses.
    async fn read_reply(&mut self) -> Result<RpcReply> {
        let mut buf = vec![0u8; BUF_SIZE];
        let mut pending = Vec::new();

        loop {
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Err(HarnessError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server before a reply arrived",
                )));
            }
            pending.extend_from_slice(&buf[..n]);

            let mut de = Deserializer::from_slice(&pending).into_iter::<RpcReply>();
            match de.next() {
                Some(Ok(reply)) => return Ok(reply),
                Some(Err(e)) if e.is_eof() => continue,
                Some(Err(e)) => return Err(e.into()),
                None => continue,
            }
        }
    }
}
