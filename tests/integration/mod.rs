//! Integration tests against the scripted backend and a mock HTTP server

pub mod config_file_test;
pub mod http_client_test;
