//! Question answering over customer-data-platform documentation sites.
//!
//! A question is classified to a (platform, section) coordinate, the matching live
//! page is fetched and reduced to display text, and a ranked sweep over every section
//! of the platform is used when the direct route yields nothing.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod knowledge;
pub mod network;
pub mod ops;
pub mod refinery;
