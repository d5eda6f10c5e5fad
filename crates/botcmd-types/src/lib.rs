//! Shared domain types for botcmd.
//!
//! This crate contains the domain types passed between the command matcher,
//! the tokenizer and the argument parser: Message, Entity, Argument,
//! Namespace, configuration and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod argument;
pub mod config;
pub mod entity;
pub mod error;
pub mod message;
pub mod namespace;
pub mod utf16;
