use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use axum_extra::TypedHeader;
use serde::Serialize;

use axum_accept::{Accept, Alternative, NotAcceptable};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let router = Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/report", get(report));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, router).await.unwrap();
}

#[derive(Debug, Clone, Serialize)]
struct Report {
    service: &'static str,
    healthy: bool,
    uptime_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Json,
    Html,
    Plain,
}

async fn report(accept: Option<TypedHeader<Accept>>) -> Response {
    let accept = accept.map(|TypedHeader(accept)| accept).unwrap_or_else(Accept::any);

    let alternatives = vec![
        Alternative::new("application/json", Format::Json),
        Alternative::new("text/html", Format::Html),
        Alternative::new("text/plain", Format::Plain),
    ];

    let report = Report {
        service: "demo",
        healthy: true,
        uptime_secs: 4242,
    };

    match accept.negotiate(alternatives) {
        Ok(Some(Format::Json)) => match serde_json::to_string(&report) {
            Ok(body) => negotiated("application/json", body),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
        },
        Ok(Some(Format::Html)) => negotiated(
            "text/html",
            format!(
                "<h1>{}</h1><p>healthy: {}, uptime: {}s</p>",
                report.service, report.healthy, report.uptime_secs
            ),
        ),
        Ok(Some(Format::Plain)) => negotiated(
            "text/plain",
            format!(
                "{} healthy={} uptime={}s",
                report.service, report.healthy, report.uptime_secs
            ),
        ),
        Ok(None) => NotAcceptable.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

// negotiated responses vary on the request Accept header
fn negotiated(content_type: &'static str, body: String) -> Response {
    let headers = [
        ("Content-Type", HeaderValue::from_static(content_type)),
        ("Vary", HeaderValue::from_static("Accept")),
    ];
    (StatusCode::OK, headers, body).into_response()
}
