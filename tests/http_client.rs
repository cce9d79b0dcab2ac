// Integration tests for the JSON-RPC HTTP client

use mcp_probe::rpc::{Correlation, Response};
use mcp_probe::{ClientError, Endpoint, HttpRpcClient, JsonRpcRequest, Reply, RequestId};
use mockito::{Matcher, Server};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn client_for(url: &str) -> HttpRpcClient {
    HttpRpcClient::new(Endpoint::parse(url).unwrap()).unwrap()
}

fn params(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_round_trip_echo() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let expected_len = serde_json::to_vec(&JsonRpcRequest::call("tools/list", Map::new(), 2))
        .unwrap()
        .len();

    // Exact body match: no params member for an empty mapping.
    let mock = server
        .mock("POST", "/mcp")
        .match_header("content-type", "application/json")
        .match_header("content-length", expected_len.to_string().as_str())
        .match_body(Matcher::Json(json!({
            "jsonrpc": "2.0",
            "method": "tools/list",
            "id": 2
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 2, "result": {"echo": "tools/list"}}).to_string())
        .create_async()
        .await;

    let reply = client
        .send("tools/list", Map::new(), Some(RequestId::from(2)), None)
        .await
        .unwrap();

    mock.assert_async().await;
    match reply {
        Reply::Response { body, correlation } => {
            assert_eq!(body["result"]["echo"], "tools/list");
            assert_eq!(correlation, Correlation::Matched);
        }
        other => panic!("expected a response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_params_and_string_id_on_the_wire() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let mock = server
        .mock("POST", "/mcp")
        .match_body(Matcher::Json(json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {
                "name": "remote_address_lookup",
                "arguments": {"zip_code": "90210"}
            },
            "id": "call-5"
        })))
        .with_status(200)
        .with_body(json!({"jsonrpc": "2.0", "id": "call-5", "result": {"content": []}}).to_string())
        .create_async()
        .await;

    let reply = client
        .send(
            "tools/call",
            params(json!({"name": "remote_address_lookup", "arguments": {"zip_code": "90210"}})),
            Some(RequestId::from("call-5")),
            None,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(matches!(
        reply,
        Reply::Response {
            correlation: Correlation::Matched,
            ..
        }
    ));
}

#[tokio::test]
async fn test_notification_is_acknowledged_not_decoded() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let mock = server
        .mock("POST", "/mcp")
        .match_body(Matcher::Json(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        })))
        .with_status(202)
        .with_body("accepted")
        .create_async()
        .await;

    let reply = client
        .send("notifications/initialized", Map::new(), None, None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(reply, Reply::Acknowledged { status: 202 });
}

#[tokio::test]
async fn test_notification_resolves_on_status_line() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Answer 202 with an event stream and then keep the connection open.
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(
                b"HTTP/1.1 202 Accepted\r\n\
                  content-type: text/event-stream\r\n\
                  transfer-encoding: chunked\r\n\r\n",
            )
            .await
            .unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let client = client_for(&format!("http://{}/mcp", addr));
    let reply = client
        .send(
            "notifications/initialized",
            Map::new(),
            None,
            Some(Duration::from_millis(200)),
        )
        .await;

    assert!(
        matches!(reply, Ok(Reply::Acknowledged { status: 202 })),
        "got {:?}",
        reply
    );
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let _mock = server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_body("not-json")
        .create_async()
        .await;

    let err = client
        .send("initialize", Map::new(), Some(RequestId::from(1)), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "malformed_response");
    assert!(err.to_string().contains("not-json"));
    match err {
        ClientError::MalformedResponse { method, body, .. } => {
            assert_eq!(method, "initialize");
            assert_eq!(body, "not-json");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_envelope_returned_verbatim() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let body = json!({
        "jsonrpc": "2.0",
        "id": 4,
        "error": {"code": -32601, "message": "Method not found"}
    });
    let _mock = server
        .mock("POST", "/mcp")
        .with_status(404)
        .with_body(body.to_string())
        .create_async()
        .await;

    let reply = client
        .send("prompts/list", Map::new(), Some(RequestId::from(4)), None)
        .await
        .unwrap();

    let decoded = reply.body().unwrap();
    assert_eq!(decoded, &body);
    assert!(matches!(
        Response::classify(decoded),
        Some(Response::Error { .. })
    ));
}

#[tokio::test]
async fn test_mismatched_id_is_reported() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let _mock = server
        .mock("POST", "/mcp")
        .with_status(200)
        .with_body(json!({"jsonrpc": "2.0", "id": 99, "result": {}}).to_string())
        .create_async()
        .await;

    let reply = client
        .send("tools/list", Map::new(), Some(RequestId::from(2)), None)
        .await
        .unwrap();

    assert_eq!(
        reply,
        Reply::Response {
            body: json!({"jsonrpc": "2.0", "id": 99, "result": {}}),
            correlation: Correlation::Mismatched {
                expected: RequestId::from(2),
                received: json!(99),
            },
        }
    );
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept connections and never answer.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = client_for(&format!("http://{}/mcp", addr));
    let start = Instant::now();
    let err = client
        .send(
            "tools/list",
            Map::new(),
            Some(RequestId::from(2)),
            Some(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, ClientError::Timeout { .. }), "got {:?}", err);
    assert!(elapsed < Duration::from_millis(100), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    // Grab a free port, then release it so nothing listens there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}/mcp", addr));
    let timeout = Duration::from_millis(2000);
    let start = Instant::now();
    let err = client
        .send("initialize", Map::new(), Some(RequestId::from(1)), Some(timeout))
        .await
        .unwrap_err();

    assert!(start.elapsed() < timeout);
    assert_eq!(err.kind(), "transport");
    assert_eq!(err.method(), "initialize");
}

#[tokio::test]
async fn test_health_check_hits_root() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let status = client.check_health(None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_calls_are_independent() {
    let mut server = Server::new_async().await;
    let client = client_for(&format!("{}/mcp", server.url()));

    let _bad = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "resources/list"})))
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;
    let _good = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "prompts/list"})))
        .with_status(200)
        .with_body(json!({"jsonrpc": "2.0", "id": 4, "result": {"prompts": []}}).to_string())
        .create_async()
        .await;

    let first = client
        .send("resources/list", Map::new(), Some(RequestId::from(3)), None)
        .await;
    let second = client
        .send("prompts/list", Map::new(), Some(RequestId::from(4)), None)
        .await;

    assert!(matches!(first, Err(ClientError::MalformedResponse { .. })));
    assert_eq!(second.unwrap().body().unwrap()["result"]["prompts"], json!([]));
}
