// * HTTP surface
// * POST /ask answers a question, GET /health reports liveness and platforms,
// * GET /metrics exposes Prometheus counters. Every response carries permissive CORS headers.

use futures::FutureExt;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::constants::SERVICE_VERSION;
use crate::engine::{AnswerResponse, Answerer};
use crate::ops::telemetry;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("HTTP server error: {0}")]
    Hyper(#[from] hyper::Error),
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub supported_platforms: Vec<String>,
}

fn with_cors(mut response: Response<Body>) -> Response<Body> {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    response
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_cors(response)
}

fn answer_response(answer: &AnswerResponse) -> Response<Body> {
    json_response(StatusCode::OK, answer.to_json())
}

async fn handle_ask(answerer: &Answerer, req: Request<Body>) -> Response<Body> {
    let bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return answer_response(&AnswerResponse::generic_error());
        }
    };

    let ask: AskRequest = match serde_json::from_slice(&bytes) {
        Ok(ask) => ask,
        Err(e) => {
            warn!(error = %e, "Malformed ask request");
            return answer_response(&AnswerResponse::bad_request("Invalid JSON body"));
        }
    };

    // * A panic while answering must not take the connection down with it
    let outcome = AssertUnwindSafe(answerer.answer_question(&ask.question))
        .catch_unwind()
        .await;

    match outcome {
        Ok(answer) => answer_response(&answer),
        Err(_) => {
            error!(question = %ask.question, "Server error while answering");
            telemetry::record_answer("error");
            answer_response(&AnswerResponse::generic_error())
        }
    }
}

fn handle_health(answerer: &Answerer) -> Response<Body> {
    let health = HealthResponse {
        status: "healthy",
        version: SERVICE_VERSION,
        supported_platforms: answerer.supported_platforms(),
    };
    let body = serde_json::to_string(&health).unwrap_or_else(|_| "{}".to_string());
    json_response(StatusCode::OK, body)
}

/// Routes one request
pub async fn route(answerer: Arc<Answerer>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::OPTIONS, _) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::NO_CONTENT;
            with_cors(response)
        }
        (&Method::POST, "/ask") => handle_ask(&answerer, req).await,
        (_, "/ask") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            r#"{"error":"Method Not Allowed"}"#.to_string(),
        ),
        (&Method::GET, "/health") => handle_health(&answerer),
        (&Method::GET, "/metrics") => {
            let mut response = Response::new(Body::from(telemetry::metrics_text()));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"));
            with_cors(response)
        }
        _ => json_response(StatusCode::NOT_FOUND, r#"{"error":"Not Found"}"#.to_string()),
    };

    Ok(response)
}

/// Serves until `shutdown` resolves
pub async fn serve<F>(answerer: Arc<Answerer>, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let make_svc = make_service_fn(move |_conn| {
        let answerer = answerer.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| route(answerer.clone(), req)))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    info!(addr = %server.local_addr(), "Starting CDP documentation API server");

    server.with_graceful_shutdown(shutdown).await?;
    info!("CDP documentation API server stopped");
    Ok(())
}
