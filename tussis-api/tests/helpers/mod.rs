//! Shared test helpers for tussis-api integration tests

pub mod fixtures;
