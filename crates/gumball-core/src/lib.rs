//! Core types and trait definitions for the gumball mint gallery.
//!
//! This crate is deliberately free of HTTP, chain, and database
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chain;
pub mod error;
pub mod machine;
pub mod metadata;
pub mod mint;
pub mod ownership;
pub mod reconcile;
pub mod source;
pub mod store;

pub use error::{Error, Result};
