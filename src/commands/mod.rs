//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - test: Test configuration validity
//! - migrate: Apply database migrations
//! - config: Configuration display

pub mod config;
pub mod migrate;
pub mod start;
pub mod test;
