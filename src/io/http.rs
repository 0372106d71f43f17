//! Feature query HTTP endpoint
//!
//! Serves one page of the simulation per `GET /query`, plus `/health` and
//! Prometheus `/metrics`. Uses hyper for the HTTP server.

use crate::infra::metrics::Metrics;
use crate::io::prometheus::format_prometheus_metrics;
use crate::services::mock_service::MockService;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Simulation shared across connections; each query holds the lock for one
/// full page computation
pub type SharedService = Arc<Mutex<MockService>>;

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    service: SharedService,
    metrics: Arc<Metrics>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/query") => {
            let page = service.lock().next();
            match page {
                Ok(body) => Ok(json_response(StatusCode::OK, body)),
                Err(e) => {
                    error!(error = %e, "query_failed");
                    Ok(json_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        r#"{"error":"serialize_failed"}"#.to_string(),
                    ))
                }
            }
        }
        (&Method::OPTIONS, "/query") => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Full::new(Bytes::from("")))
            .expect("static response should not fail")),
        (&Method::GET, "/metrics") => {
            let body = format_prometheus_metrics(&metrics);
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
                .body(Full::new(Bytes::from(body)))
                .expect("static response should not fail"))
        }
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .expect("static response should not fail")),
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Start the feature query HTTP server
pub async fn start_query_server(
    addr: SocketAddr,
    service: SharedService,
    metrics: Arc<Metrics>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;

    info!(addr = %addr, "query_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let service = service.clone();
                        let metrics = metrics.clone();

                        tokio::spawn(async move {
                            let handler = service_fn(move |req| {
                                let service = service.clone();
                                let metrics = metrics.clone();
                                async move { handle_request(req, service, metrics).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, handler)
                                .await
                            {
                                error!(error = %e, "query_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "query_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("query_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}
