pub mod client;
pub mod errors;
pub mod fixture;
pub mod identity;
pub mod retry;

pub use client::{HttpPageSource, PageSource};
pub use errors::NetworkError;
pub use fixture::{RecordingSleeper, StaticPageSource};
pub use identity::BrowserIdentity;
pub use retry::{RetryExhausted, RetryPolicy, Sleeper, TokioSleeper};
