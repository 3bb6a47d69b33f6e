//! Unit tests
//!
//! - `workflow_handle_tests`: the async workflow driver (in-flight guard,
//!   timeouts, failure and retry) against fakes and `mockall` mocks
//! - `http_service_tests`: `HttpContentService` against a `wiremock` server

mod workflow_handle_tests;
