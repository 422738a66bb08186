//! # Transport Tests
//!
//! Run the HTTP-based transports against a fake printer served from a local
//! axum listener.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use pretty_assertions::assert_eq;
use rasterprint::{
    PrintError, Transport, job,
    transport::{
        HttpTransport, IppTransport,
        ipp::{self, IppResponse},
    },
};

/// What the fake printer received.
#[derive(Default)]
struct Received {
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone)]
struct FakePrinter {
    received: Arc<Mutex<Received>>,
    status: StatusCode,
    reply: Vec<u8>,
}

async fn accept(
    State(printer): State<FakePrinter>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    {
        let mut received = printer.received.lock().unwrap();
        received.content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        received.body = body.to_vec();
    }
    (printer.status, printer.reply.clone())
}

/// Start a fake printer and return its base URL.
async fn spawn_printer(status: StatusCode, reply: Vec<u8>) -> (String, Arc<Mutex<Received>>) {
    let received = Arc::new(Mutex::new(Received::default()));
    let printer = FakePrinter {
        received: received.clone(),
        status,
        reply,
    };
    let app = Router::new()
        .route("/printers/M200", post(accept))
        .with_state(printer);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/printers/M200", addr), received)
}

/// Minimal IPP response: version 1.1, `status`, request id 1, optional job-id.
fn ipp_reply(status: u16, job_id: Option<i32>) -> Vec<u8> {
    let mut out = vec![1, 1];
    out.extend_from_slice(&status.to_be_bytes());
    out.extend_from_slice(&1i32.to_be_bytes());
    out.push(ipp::TAG_OPERATION_ATTRIBUTES);
    if let Some(id) = job_id {
        out.push(ipp::TAG_JOB_ATTRIBUTES);
        out.push(ipp::TAG_INTEGER);
        out.extend_from_slice(&6u16.to_be_bytes());
        out.extend_from_slice(b"job-id");
        out.extend_from_slice(&4u16.to_be_bytes());
        out.extend_from_slice(&id.to_be_bytes());
    }
    out.push(ipp::TAG_END_OF_ATTRIBUTES);
    out
}

fn sample_job() -> Vec<u8> {
    job::encode(&[0u8, 0, 0, 255].repeat(16), 8)
        .unwrap()
        .into_bytes()
}

#[tokio::test]
async fn test_ipp_print_job_is_accepted() {
    let (url, received) = spawn_printer(StatusCode::OK, ipp_reply(0x0000, Some(17))).await;
    let data = sample_job();

    IppTransport::new().unwrap().send(&data, &url).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.content_type.as_deref(), Some("application/ipp"));

    let request = IppResponse::parse(&received.body).unwrap();
    assert_eq!(request.status, ipp::OP_PRINT_JOB);
    assert_eq!(
        request.attribute("printer-uri").unwrap().value,
        url.as_bytes().to_vec()
    );
    assert_eq!(
        request.attribute("document-format").unwrap().value,
        b"application/octet-stream".to_vec()
    );
    assert!(received.body.ends_with(&data));
}

#[tokio::test]
async fn test_ipp_error_status_is_reported() {
    // 0x0507 = server-error-printer-is-deactivated
    let (url, _) = spawn_printer(StatusCode::OK, ipp_reply(0x0507, None)).await;

    let err = IppTransport::new()
        .unwrap()
        .send(&sample_job(), &url)
        .await
        .unwrap_err();
    match err {
        PrintError::Transport(msg) => assert!(msg.contains("0x0507"), "{}", msg),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ipp_http_failure_is_reported() {
    let (url, _) = spawn_printer(StatusCode::NOT_FOUND, Vec::new()).await;
    let result = IppTransport::new().unwrap().send(&sample_job(), &url).await;
    assert!(matches!(result, Err(PrintError::Transport(_))));
}

#[tokio::test]
async fn test_http_post_sends_raw_bytes() {
    let (url, received) = spawn_printer(StatusCode::OK, Vec::new()).await;
    let data = sample_job();

    HttpTransport::new().unwrap().send(&data, &url).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(
        received.content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(received.body, data);
}

#[tokio::test]
async fn test_http_post_error_status() {
    let (url, _) = spawn_printer(StatusCode::INTERNAL_SERVER_ERROR, b"jammed".to_vec()).await;

    let err = HttpTransport::new()
        .unwrap()
        .send(&sample_job(), &url)
        .await
        .unwrap_err();
    match err {
        PrintError::Transport(msg) => assert!(msg.contains("jammed"), "{}", msg),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_printer() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = HttpTransport::new()
        .unwrap()
        .send(&sample_job(), &format!("http://{}/print", addr))
        .await;
    assert!(matches!(result, Err(PrintError::Transport(_))));
}
