use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::client::InvokeClient;
use crate::error::HarnessError;
use crate::rpc::InvokeRequest;

/// Mock invocation server: accepts one connection, captures the call it
/// receives and answers with the canned reply. Returns the port and a handle
/// resolving to the captured call.
async fn spawn_invoke_server(reply: Value) -> (u16, JoinHandle<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut buf = vec![0u8; 65536];
        let mut pending = Vec::new();
        let call: Value = loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending a call");
            pending.extend_from_slice(&buf[..n]);
            if let Ok(v) = serde_json::from_slice(&pending) {
                break v;
            }
        };

        stream
            .write_all(&serde_json::to_vec(&reply).unwrap())
            .await
            .unwrap();
        call
    });

    (port, handle)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invoke_round_trip() {
    let reply = json!({"id": 0, "result": {"Payload": null, "Error": null}, "error": null});
    let (port, server) = spawn_invoke_server(reply).await;

    let mut client = InvokeClient::connect(&format!("localhost:{port}"))
        .await
        .unwrap();
    let request = InvokeRequest::new(br#"{"a":1}"#.to_vec(), 300);
    let reply = client.invoke(&request).await.unwrap();

    assert!(reply.error.is_none());
    assert!(reply.result.is_some());

    let call = server.await.unwrap();
    assert_eq!(call["method"], "Function.Invoke");
    assert_eq!(call["id"], 0);
    assert_eq!(call["params"][0]["RequestId"], "1");
    assert_eq!(call["params"][0]["XAmznTraceId"], "1");
    assert_eq!(call["params"][0]["Deadline"]["Seconds"], 300);
    assert_eq!(call["params"][0]["Payload"], "eyJhIjoxfQ==");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invoke_error_reply_is_surfaced() {
    let reply = json!({"id": 0, "result": null, "error": "function panicked"});
    let (port, server) = spawn_invoke_server(reply).await;

    let mut client = InvokeClient::connect(&format!("localhost:{port}"))
        .await
        .unwrap();
    let request = InvokeRequest::new(b"{}".to_vec(), 10);
    let reply = client.invoke(&request).await.unwrap();

    assert_eq!(reply.error.as_deref(), Some("function panicked"));
    assert!(reply.result.is_none());

    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connect_waits_for_a_late_listener() {
    // Reserve a port, release it, then start listening on it only after the
    // client has begun its retry loop.
    let reserved = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = reserved.local_addr().unwrap().port();
    drop(reserved);

    let server = tokio::spawn(async move {
        sleep(Duration::from_millis(750)).await;
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        let _ = listener.accept().await.unwrap();
    });

    let client = InvokeClient::connect(&format!("localhost:{port}")).await;
    assert!(client.is_ok());

    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reply_split_across_writes_is_reassembled() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut buf = vec![0u8; 65536];
        let mut pending = Vec::new();
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0);
            pending.extend_from_slice(&buf[..n]);
            if serde_json::from_slice::<Value>(&pending).is_ok() {
                break;
            }
        }

        let reply = serde_json::to_vec(
            &json!({"id": 0, "result": {"Payload": null, "Error": null}, "error": null}),
        )
        .unwrap();
        let (head, tail) = reply.split_at(reply.len() / 2);
        stream.write_all(head).await.unwrap();
        stream.flush().await.unwrap();
        sleep(Duration::from_millis(50)).await;
        stream.write_all(tail).await.unwrap();
    });

    let mut client = InvokeClient::connect(&format!("localhost:{port}"))
        .await
        .unwrap();
    let reply = client
        .invoke(&InvokeRequest::new(b"{}".to_vec(), 1))
        .await
        .unwrap();
    assert!(reply.error.is_none());

    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_closing_early_is_an_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 65536];
        let _ = stream.read(&mut buf).await.unwrap();
        // Drop without replying.
    });

    let mut client = InvokeClient::connect(&format!("localhost:{port}"))
        .await
        .unwrap();
    let err = client
        .invoke(&InvokeRequest::new(b"{}".to_vec(), 1))
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::Io(_)));
    assert_eq!(err.exit_code(), 1);

    server.await.unwrap();
}
