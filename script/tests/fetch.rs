//! Remote semantic data, served by a one-shot local HTTP server.
#![cfg(feature = "fetch")]

use qworum_script::rdf::{FetchConfig, RdfTerm};
use qworum_script::{RdfError, SemanticData};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answers the first request on a fresh port and returns the URL of `path`.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
    path: &str,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("binds");
    let addr = listener.local_addr().expect("has an address");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accepts");
        let mut request = vec![0u8; 4096];
        let _ = socket.read(&mut request).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("writes");
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}{path}")
}

#[tokio::test]
async fn relative_iris_resolve_against_the_fetched_url() {
    let turtle = "text/turtle; charset=utf-8";
    let url = serve_once("200 OK", turtle, "<a> <b> <../c> .", "/docs/data.ttl").await;
    let mut data = SemanticData::build();
    let added = data.read_from_url(&url).await.expect("fetches");
    assert_eq!(added, 1);

    let origin = url.trim_end_matches("/docs/data.ttl");
    let quad = data.quads().next().expect("one quad");
    assert_eq!(quad.subject(), &RdfTerm::iri(format!("{origin}/docs/a")));
    assert_eq!(quad.object(), &RdfTerm::iri(format!("{origin}/c")));
}

#[tokio::test]
async fn n_quads_are_detected_from_the_content_type() {
    let body = "<urn:a> <urn:b> <urn:c> <urn:g> .\n";
    let url = serve_once("200 OK", "application/n-quads", body, "/q.nq").await;
    let mut data = SemanticData::build();
    data.read_from_url_with(&url, &FetchConfig::default())
        .await
        .expect("fetches");
    let quad = data.quads().next().expect("one quad");
    assert_eq!(quad.graph(), &RdfTerm::iri("urn:g"));
}

#[tokio::test]
async fn error_statuses_surface_as_fetch_errors() {
    let url = serve_once("404 Not Found", "text/plain", "gone", "/missing.ttl").await;
    let mut data = SemanticData::build();
    let err = data.read_from_url(&url).await.expect_err("not found");
    let RdfError::Fetch { url: failed, source } = err else {
        panic!("expected a fetch error, got {err}");
    };
    assert_eq!(failed, url);
    assert_eq!(source.status().map(|s| s.as_u16()), Some(404));
    assert!(data.is_empty());
}
