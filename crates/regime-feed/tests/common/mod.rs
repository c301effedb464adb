//! Shared helpers for regime-feed integration tests.

pub mod mock_http;
