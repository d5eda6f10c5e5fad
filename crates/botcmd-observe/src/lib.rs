//! Tracing subscriber setup for botcmd binaries.

pub mod tracing_setup;
