// * Configuration Constants
// * Central location for retry budgets, timeouts and display limits

// * Attempts per page fetch before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// * Pause between fetch attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;

// * Connect/read timeout for one fetch attempt in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// * Maximum display blocks kept after reflowing a page
pub const MAX_DISPLAY_BLOCKS: usize = 45;

// * Characters of each ranked section shown in a search answer
pub const SEARCH_SNIPPET_CHARS: usize = 300;

// * Ranked sections returned by the relevance search
pub const DEFAULT_MAX_RESULTS: usize = 3;

// * Keywords shorter than this are ignored by the relevance search
pub const MIN_KEYWORD_LEN: usize = 3;

// * Default listen address for the HTTP surface
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

// * Version reported by the health endpoint
pub const SERVICE_VERSION: &str = "1.2.0";
