//! Shared test utilities for the bundestag-mcp workspace.
//!
//! This crate is a dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`mock`]: [`MockDip`], an in-process HTTP stand-in for the DIP API
//! - [`fixtures`]: listing bodies and a sample protocol transcript

pub mod fixtures;
pub mod mock;

pub use mock::{MockDip, MockResponse, RecordedRequest, unreachable_base_url};
