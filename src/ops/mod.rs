// * Operations: structured logging, Prometheus metrics and the HTTP surface

pub mod server;
pub mod telemetry;

pub use server::{route, serve, AskRequest, HealthResponse, ServerError};
pub use telemetry::{init_tracing, init_tracing_pretty, metrics_text};
