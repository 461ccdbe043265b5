//! Integration tests for the ChatRelay server.

mod health_test;
mod helpers;
mod ws_test;
