// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging setup plus the counters the fetch/search/answer path reports into

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Fetch attempts and outcomes: success, transient, exhausted, unexpected, empty
    pub static ref FETCH_ATTEMPTS_TOTAL: CounterVec = register_counter_vec!(
        "cdp_fetch_attempts_total",
        "Documentation fetch outcomes by kind",
        &["outcome"]
    ).unwrap();

    // * Wall time of a successful fetch including retries and extraction
    pub static ref FETCH_DURATION_SECONDS: Histogram = register_histogram!(
        "cdp_fetch_duration_seconds",
        "Documentation fetch duration in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    // * Answers by response status
    pub static ref ANSWERS_TOTAL: CounterVec = register_counter_vec!(
        "cdp_answers_total",
        "Answered questions by status",
        &["status"]
    ).unwrap();

    // * Sections fetched and scored during relevance searches
    pub static ref SEARCH_SECTIONS_SCORED_TOTAL: Counter = register_counter!(
        "cdp_search_sections_scored_total",
        "Sections scored by the relevance search"
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting.
/// `RUST_LOG` wins over `default_filter` when set.
///
/// # Example
/// ```ignore
/// use cdp_docs::ops::telemetry;
///
/// telemetry::init_tracing("info");
/// tracing::info!(platform = "segment", "Scraping documentation");
/// ```
pub fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .try_init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty())
        .try_init();
}

/// Returns the current metrics in the Prometheus text format
pub fn metrics_text() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_fetch_outcome(outcome: &str) {
    FETCH_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_fetch_duration(seconds: f64) {
    FETCH_DURATION_SECONDS.observe(seconds);
}

pub fn record_answer(status: &str) {
    ANSWERS_TOTAL.with_label_values(&[status]).inc();
}

pub fn record_section_scored() {
    SEARCH_SECTIONS_SCORED_TOTAL.inc();
}
